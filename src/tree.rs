use serde_json::json;

use crate::errors::{RouterError, RouterErrorCode, RouterResult};
use crate::params::CaptureSink;
use crate::path::longest_common_prefix;
use crate::radix::{Node, NodeKind};

/// The wildcard method bucket. Routes registered under it are matched only
/// when the caller retries after an exact-method miss; the tree itself never
/// falls through.
pub const METHOD_WILD: &str = "*";

/// Compressed radix tree mapping `(method, path)` to handlers of type `T`.
///
/// Build-once, read-many: all [`Tree::add`] calls happen during setup, after
/// which the tree may be shared freely across readers (publish it with a
/// release-acquire handoff; there is no internal locking). Lookup allocates
/// nothing on the happy path and is bounded by the depth of the longest
/// registered pattern.
#[derive(Debug)]
pub struct Tree<T> {
    root: Node<T>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Tree {
            root: Node::new(NodeKind::Root, ""),
        }
    }

    /// Registers `handler` for `(method, path)`. `method` is an opaque
    /// non-empty token (upper-case HTTP names by convention, [`METHOD_WILD`]
    /// for the wildcard bucket); `path` must begin with `/`.
    ///
    /// Every failure is registration-time fatal: validation, placement and
    /// conflict errors come back as `Err`, and a tree that returned one is
    /// left in an unspecified (but memory-safe) state.
    #[tracing::instrument(level = "trace", skip(self, handler))]
    pub fn add(&mut self, method: &str, path: &str, handler: T) -> RouterResult<()> {
        if method.is_empty() {
            return Err(RouterError::new(
                RouterErrorCode::MethodEmpty,
                format!("method must not be empty in path '{path}'"),
                Some(json!({ "path": path })),
            ));
        }

        if !path.starts_with('/') {
            return Err(RouterError::new(
                RouterErrorCode::PathMissingLeadingSlash,
                format!("path must begin with '/' in path '{path}'"),
                Some(json!({ "path": path })),
            ));
        }

        let full_path = path;
        let mut remainder = path;

        let i = longest_common_prefix(remainder, &self.root.path);
        if i > 0 {
            if self.root.path.len() > i {
                self.root.split(i);
            }

            remainder = &remainder[i..];
        }

        self.root.add(method, remainder, full_path, handler)?;

        // Keep the invariant "the root's path is the longest common prefix
        // of all registered paths": after the very first insertion the empty
        // root hands over to its only child.
        if self.root.path.is_empty() && self.root.children.len() == 1 {
            let promoted = self.root.children.remove(0);
            self.root = promoted;
            self.root.kind = NodeKind::Root;
        }

        self.root.sort();

        Ok(())
    }

    /// Looks `path` up under `method`, recording captures into `sink`.
    ///
    /// Returns `(Some(handler), false)` on a concrete hit,
    /// `(None, true)` when only the trailing-slash sibling of `path` is
    /// registered (redirect recommendation), and `(None, false)` on a miss.
    /// On anything but a hit the sink is left untouched.
    pub fn get<'t, S: CaptureSink>(
        &'t self,
        method: &str,
        path: &str,
        sink: Option<&mut S>,
    ) -> (Option<&'t T>, bool) {
        tracing::event!(tracing::Level::TRACE, operation = "get", method, path);

        let root = &self.root;

        if path.len() > root.path.len() {
            if !path.as_bytes().starts_with(root.path.as_bytes()) {
                return (None, false);
            }

            return root.get_from_child(method, &path[root.path.len()..], sink);
        }

        if path == root.path {
            let Some(record) = root.handlers.get(method) else {
                return (None, false);
            };

            if record.tsr {
                return (None, true);
            }

            if let Some(handler) = &record.handler {
                return (Some(handler), false);
            }

            if let Some(wildcard) = &record.wildcard {
                if let Some(sink) = sink {
                    sink.record(&wildcard.param_key, "/");
                }

                return (Some(&wildcard.handler), false);
            }
        }

        (None, false)
    }

    /// Case-insensitive lookup that reconstructs the canonical registered
    /// path into `buf` (appended; existing content is preserved). When the
    /// walk lands on a trailing-slash redirect, the `/` is fixed up iff
    /// `fix_trailing_slash` is set. On failure `buf` is truncated back to
    /// its pre-call length.
    #[tracing::instrument(level = "trace", skip(self, buf))]
    pub fn find_case_insensitive_path(
        &self,
        method: &str,
        path: &str,
        fix_trailing_slash: bool,
        buf: &mut String,
    ) -> bool {
        let pre = buf.len();

        let (found, tsr) = self.root.find(method, path, buf);

        if !found || (tsr && !fix_trailing_slash) {
            buf.truncate(pre);
            return false;
        }

        true
    }
}
