use super::{Node, NodeKind};
use crate::params::CaptureSink;
use crate::path::{eq_fold, segment_end_index};

impl<T> Node<T> {
    /// Resolves `path` (the remainder below this node) to a handler for
    /// `method`. Returns `(handler, tsr)`; captures are recorded into `sink`
    /// only while unwinding a successful branch, so a miss leaves the sink
    /// untouched.
    pub(crate) fn get_from_child<'t, S: CaptureSink>(
        &'t self,
        method: &str,
        path: &str,
        mut sink: Option<&mut S>,
    ) -> (Option<&'t T>, bool) {
        let mut node = self;
        let mut path = path;

        'walk: loop {
            for child in &node.children {
                match child.kind {
                    NodeKind::Static => {
                        // First-byte check before the full prefix compare.
                        if path.as_bytes()[0] != child.path.as_bytes()[0] {
                            continue;
                        }

                        if path.len() > child.path.len() {
                            if !path.as_bytes().starts_with(child.path.as_bytes()) {
                                continue;
                            }

                            path = &path[child.path.len()..];
                            node = child;
                            continue 'walk;
                        } else if path == child.path {
                            let Some(record) = child.handlers.get(method) else {
                                return (None, false);
                            };

                            if record.tsr {
                                return (None, true);
                            }

                            if let Some(handler) = &record.handler {
                                return (Some(handler), false);
                            }

                            if let Some(wildcard) = &record.wildcard {
                                if let Some(sink) = sink.as_deref_mut() {
                                    sink.record(&wildcard.param_key, path);
                                }

                                return (Some(&wildcard.handler), false);
                            }

                            return (None, false);
                        }
                    }
                    NodeKind::Param => {
                        let end = segment_end_index(path);
                        let Some(values) = child.param_match(&path[..end]) else {
                            continue;
                        };

                        if path.len() > end {
                            let (handler, tsr) =
                                child.get_from_child(method, &path[end..], sink.as_deref_mut());

                            if tsr {
                                return (None, true);
                            }

                            if let Some(handler) = handler {
                                if let Some(sink) = sink.as_deref_mut() {
                                    for (key, value) in child.param_keys.iter().zip(values) {
                                        sink.record(key, value);
                                    }
                                }

                                return (Some(handler), false);
                            }
                        } else {
                            let Some(record) = child.handlers.get(method) else {
                                return (None, false);
                            };

                            if record.tsr {
                                return (None, true);
                            }

                            if let Some(handler) = &record.handler {
                                if let Some(sink) = sink.as_deref_mut() {
                                    for (key, value) in child.param_keys.iter().zip(values) {
                                        sink.record(key, value);
                                    }
                                }

                                return (Some(handler), false);
                            }

                            return (None, false);
                        }
                    }
                    NodeKind::Root | NodeKind::Wildcard => unreachable!("invalid node type"),
                }
            }

            // No child consumed the remainder: fall back to a catch-all
            // registered on this node.
            if let Some(record) = node.handlers.get(method) {
                if let Some(wildcard) = &record.wildcard {
                    if let Some(sink) = sink.as_deref_mut() {
                        sink.record(&wildcard.param_key, path);
                    }

                    return (Some(&wildcard.handler), false);
                }
            }

            return (None, false);
        }
    }

    /// Case-insensitive walk: consumes `path` against this node's fragment
    /// under a Unicode lower-fold and appends the node's canonical bytes to
    /// `buf`. Returns `(found, tsr)`; on any miss `buf` is rewound to the
    /// length it had on entry.
    pub(crate) fn find(&self, method: &str, path: &str, buf: &mut String) -> (bool, bool) {
        let pre = buf.len();

        if path.len() > self.path.len() {
            // A cut that lands inside a UTF-8 sequence cannot match.
            let Some(head) = path.get(..self.path.len()) else {
                return (false, false);
            };

            if !eq_fold(head, &self.path) {
                return (false, false);
            }

            buf.push_str(&self.path);

            let (found, tsr) = self.find_from_child(method, &path[self.path.len()..], buf);
            if found {
                return (found, tsr);
            }

            buf.truncate(pre);

            (false, false)
        } else if eq_fold(path, &self.path) {
            let Some(record) = self.handlers.get(method) else {
                return (false, false);
            };

            buf.push_str(&self.path);

            if record.tsr {
                if self.path == "/" {
                    buf.truncate(pre);
                } else {
                    buf.push('/');
                }

                return (true, true);
            }

            (true, false)
        } else {
            (false, false)
        }
    }

    fn find_from_child(&self, method: &str, path: &str, buf: &mut String) -> (bool, bool) {
        let pre = buf.len();

        for child in &self.children {
            match child.kind {
                NodeKind::Static => {
                    let (found, tsr) = child.find(method, path, buf);
                    if found {
                        return (found, tsr);
                    }
                }
                NodeKind::Param => {
                    let end = segment_end_index(path);
                    if child.param_match(&path[..end]).is_none() {
                        continue;
                    }

                    // Parameter values are copied into the canonical path
                    // verbatim, never case-folded.
                    buf.push_str(&path[..end]);

                    if path.len() > end {
                        let (found, tsr) = child.find_from_child(method, &path[end..], buf);
                        if found {
                            return (found, tsr);
                        }
                    } else {
                        let Some(record) = child.handlers.get(method) else {
                            buf.truncate(pre);
                            return (false, false);
                        };

                        if record.tsr {
                            buf.push('/');
                            return (true, true);
                        }

                        return (true, false);
                    }

                    buf.truncate(pre);
                }
                NodeKind::Root | NodeKind::Wildcard => unreachable!("invalid node type"),
            }
        }

        if let Some(record) = self.handlers.get(method) {
            if record.wildcard.is_some() {
                buf.push_str(path);
                return (true, false);
            }
        }

        (false, false)
    }
}
