use serde_json::json;

use super::{wild_path_conflict, Node, NodeKind, WildcardNode};
use crate::errors::{RouterError, RouterErrorCode, RouterResult};
use crate::path::{longest_common_prefix, segment_end_index};
use crate::pattern::find_wild_segment;

impl<T> Node<T> {
    /// Walks the existing children looking for one that absorbs `path`,
    /// splitting static edges at the longest common prefix, and otherwise
    /// grows the tree through [`Node::insert`]. `path` is the not-yet-consumed
    /// remainder; `full_path` the complete pattern as registered, kept for
    /// error messages.
    pub(crate) fn add(
        &mut self,
        method: &str,
        path: &str,
        full_path: &str,
        handler: T,
    ) -> RouterResult<()> {
        if path.is_empty() {
            return self.set_handler(method, handler, full_path);
        }

        let mut idx = 0;
        while idx < self.children.len() {
            let i = longest_common_prefix(path, &self.children[idx].path);
            if i == 0 {
                idx += 1;
                continue;
            }

            match self.children[idx].kind {
                NodeKind::Static => {
                    if self.children[idx].path.len() > i {
                        self.children[idx].split(i);
                    }

                    if path.len() > i {
                        return self.children[idx].add(method, &path[i..], full_path, handler);
                    }

                    self.children[idx].set_handler(method, handler, full_path)?;

                    if self.children[idx].path == "/" {
                        // The non-slash variant is served from this node.
                        let record = self.handlers.entry(method.to_string()).or_default();
                        if record.handler.is_none() {
                            record.tsr = true;
                        }
                    }

                    return Ok(());
                }
                NodeKind::Param => {
                    let Some(wild) = find_wild_segment(path, full_path)? else {
                        idx += 1;
                        continue;
                    };

                    if wild.kind == NodeKind::Param && wild.start == 0 {
                        if self.children[idx].path == wild.path {
                            // Identical parameter edge: descend, or land the
                            // handler here (duplicates fail inside).
                            if path.len() > wild.end {
                                return self.children[idx].add(
                                    method,
                                    &path[wild.end..],
                                    full_path,
                                    handler,
                                );
                            }

                            return self.children[idx].set_handler(method, handler, full_path);
                        }

                        let same_constraint = self.children[idx]
                            .param_regex
                            .as_ref()
                            .map(|regex| regex.as_str())
                            == wild.regex.as_ref().map(|regex| regex.as_str());

                        if same_constraint {
                            return Err(wild_path_conflict(
                                full_path,
                                path,
                                &self.children[idx].path,
                            ));
                        }

                        // A differently-constrained parameter may sit beside
                        // this one; keep scanning.
                        idx += 1;
                        continue;
                    }

                    // Catch-all at a position already holding a parameter:
                    // it attaches to this node's method record, not to the
                    // parameter child.
                    return self.insert(method, path, full_path, handler);
                }
                NodeKind::Root | NodeKind::Wildcard => unreachable!("invalid node type"),
            }
        }

        self.insert(method, path, full_path, handler)
    }

    /// Grows the tree under this node for a remainder no existing child
    /// absorbs: materialises static prefixes, parameter edges and catch-all
    /// records as dictated by the lexer, then lands the handler on the
    /// terminal node.
    pub(crate) fn insert(
        &mut self,
        method: &str,
        path: &str,
        full_path: &str,
        handler: T,
    ) -> RouterResult<()> {
        let Some(wild) = find_wild_segment(path, full_path)? else {
            // Purely static remainder. `set_handler` takes care of the
            // slash-pairing when `path` ends at a slash boundary.
            self.children.push(Node::new(NodeKind::Static, path));
            self.children
                .last_mut()
                .expect("child just pushed")
                .set_handler(method, handler, full_path)?;

            if path == "/" {
                let record = self.handlers.entry(method.to_string()).or_default();
                if record.handler.is_none() {
                    record.tsr = true;
                }
            }

            return Ok(());
        };

        if wild.start > 0 {
            // Literal prefix before the first wildcard unit.
            self.children
                .push(Node::new(NodeKind::Static, &path[..wild.start]));

            return self
                .children
                .last_mut()
                .expect("child just pushed")
                .insert(method, &path[wild.start..], full_path, handler);
        }

        if wild.kind == NodeKind::Wildcard {
            return self.insert_catch_all(method, path, full_path, handler, wild);
        }

        // Parameter edge covering the whole current segment.
        let last_segment = path.len() == wild.end;
        let mut node = Node::new(NodeKind::Param, &path[..wild.end]);
        node.param_keys = wild.keys;
        node.param_regex = wild.regex;
        self.children.push(node);

        let node = self.children.last_mut().expect("child just pushed");
        if last_segment {
            node.set_handler(method, handler, full_path)
        } else {
            node.insert(method, &path[wild.end..], full_path, handler)
        }
    }

    fn insert_catch_all(
        &mut self,
        method: &str,
        path: &str,
        full_path: &str,
        handler: T,
        wild: crate::pattern::WildSegment,
    ) -> RouterResult<()> {
        let end = segment_end_index(path);

        if path.len() == end && !self.path.ends_with('/') {
            return Err(RouterError::new(
                RouterErrorCode::CatchAllWithoutSlash,
                format!("no / before wildcard in path '{full_path}'"),
                Some(json!({ "path": full_path })),
            ));
        }

        if path.len() != end {
            return Err(RouterError::new(
                RouterErrorCode::CatchAllNotAtEnd,
                format!("wildcard routes are only allowed at the end of the path in path '{full_path}'"),
                Some(json!({ "path": full_path })),
            ));
        }

        // A slash-ended prefix splits so the catch-all hangs off the `/`
        // node and the prefix keeps the redirect marker.
        let target = if self.path != "/" && self.path.ends_with('/') {
            self.split(self.path.len() - 1);

            let record = self.handlers.entry(method.to_string()).or_default();
            if record.handler.is_none() {
                record.tsr = true;
            }

            &mut self.children[0]
        } else {
            self
        };

        let record = target.handlers.entry(method.to_string()).or_default();

        if let Some(existing) = &record.wildcard {
            if existing.param_key == wild.keys[0] {
                return Err(RouterError::new(
                    RouterErrorCode::DuplicateHandler,
                    format!("a handle is already registered for path '{full_path}'"),
                    Some(json!({ "path": full_path, "method": method })),
                ));
            }

            return Err(wild_path_conflict(full_path, path, &existing.path));
        }

        record.wildcard = Some(WildcardNode {
            path: wild.path,
            param_key: wild.keys.into_iter().next().expect("catch-all has one key"),
            handler,
        });

        Ok(())
    }
}
