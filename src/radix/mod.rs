mod find;
mod insert;

use hashbrown::HashMap as FastHashMap;
use regex::Regex;
use serde_json::json;
use smallvec::SmallVec;

use crate::errors::{RouterError, RouterErrorCode, RouterResult};

/// Node discriminator. The ordering doubles as child-match priority: static
/// edges are tried before parameters, parameters before catch-alls. Exactly
/// one `Root` node exists per tree; `Wildcard` only ever appears in lexer
/// descriptors and method records, never as a first-class child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum NodeKind {
    Root,
    Static,
    Param,
    Wildcard,
}

/// Catch-all registered under a method record. Hangs off the owning node
/// instead of participating in the child sort order.
#[derive(Debug)]
pub(crate) struct WildcardNode<T> {
    pub path: String,
    pub param_key: String,
    pub handler: T,
}

/// Per-method state attached to a node. `handler` present and `tsr` set are
/// mutually exclusive; `wildcard` may accompany either.
#[derive(Debug)]
pub(crate) struct MethodHandler<T> {
    pub handler: Option<T>,
    pub tsr: bool,
    pub wildcard: Option<WildcardNode<T>>,
}

impl<T> Default for MethodHandler<T> {
    fn default() -> Self {
        MethodHandler {
            handler: None,
            tsr: false,
            wildcard: None,
        }
    }
}

impl<T> MethodHandler<T> {
    fn tsr_marker() -> Self {
        MethodHandler {
            handler: None,
            tsr: true,
            wildcard: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub kind: NodeKind,
    pub path: String,
    pub handlers: FastHashMap<String, MethodHandler<T>>,
    pub children: Vec<Node<T>>,
    pub param_keys: SmallVec<[String; 2]>,
    pub param_regex: Option<Regex>,
}

impl<T> Node<T> {
    pub(crate) fn new(kind: NodeKind, path: &str) -> Self {
        Node {
            kind,
            path: path.to_string(),
            handlers: FastHashMap::new(),
            children: Vec::new(),
            param_keys: SmallVec::new(),
            param_regex: None,
        }
    }

    /// Truncates this node's path at byte offset `i` and moves the suffix,
    /// together with the handlers, subtree and parameter state, into a newly
    /// synthesised static child. `i` must be a char boundary (guaranteed when
    /// it comes from `longest_common_prefix`).
    pub(crate) fn split(&mut self, i: usize) {
        let suffix = self.path.split_off(i);
        let child = Node {
            kind: NodeKind::Static,
            path: suffix,
            handlers: std::mem::take(&mut self.handlers),
            children: std::mem::take(&mut self.children),
            param_keys: std::mem::take(&mut self.param_keys),
            param_regex: self.param_regex.take(),
        };

        self.children.push(child);
    }

    /// Installs `handler` under `method` on this node.
    ///
    /// A pattern ending at a slash boundary is stored as the prefix node
    /// carrying the redirect marker plus a `/` child carrying the real
    /// handler, so the node splits itself here when needed. Installing on a
    /// node that does not end in `/` establishes the symmetric redirect on
    /// its `/` child (created on demand).
    pub(crate) fn set_handler(
        &mut self,
        method: &str,
        handler: T,
        full_path: &str,
    ) -> RouterResult<()> {
        if self.path != "/" && self.path.ends_with('/') {
            self.split(self.path.len() - 1);

            let record = self.handlers.entry(method.to_string()).or_default();
            if record.handler.is_none() {
                record.tsr = true;
            }

            return self.children[0].set_handler(method, handler, full_path);
        }

        let record = self.handlers.entry(method.to_string()).or_default();
        if record.handler.is_some() {
            return Err(RouterError::new(
                RouterErrorCode::DuplicateHandler,
                format!("a handle is already registered for path '{full_path}'"),
                Some(json!({ "path": full_path, "method": method })),
            ));
        }

        record.handler = Some(handler);
        record.tsr = false;

        if !self.path.ends_with('/') {
            self.mark_slash_child_tsr(method);
        }

        Ok(())
    }

    /// Makes sure the trailing-slash variant of this node redirects here:
    /// marks the existing `/` child for `method`, splitting a `/…`-prefixed
    /// child first when necessary, or creates the `/` child outright. Records
    /// already holding a real handler are left alone.
    pub(crate) fn mark_slash_child_tsr(&mut self, method: &str) {
        if let Some(pos) = self
            .children
            .iter()
            .position(|child| child.path.starts_with('/'))
        {
            let child = &mut self.children[pos];
            if child.path != "/" {
                child.split(1);
            }

            let record = child.handlers.entry(method.to_string()).or_default();
            if record.handler.is_none() {
                record.tsr = true;
            }
        } else {
            let mut slash = Node::new(NodeKind::Static, "/");
            slash
                .handlers
                .insert(method.to_string(), MethodHandler::tsr_marker());
            self.children.push(slash);
        }
    }

    /// Re-establishes child priority after an insertion: kind ascending,
    /// regex-constrained parameters before unconstrained ones, then the more
    /// populated subtree first. Applied bottom-up over the whole subtree.
    pub(crate) fn sort(&mut self) {
        for child in &mut self.children {
            child.sort();
        }

        self.children.sort_by(|a, b| {
            a.priority()
                .cmp(&b.priority())
                .then_with(|| b.children.len().cmp(&a.children.len()))
        });
    }

    fn priority(&self) -> (NodeKind, u8) {
        let sub = match self.kind {
            NodeKind::Param if self.param_regex.is_some() => 0,
            NodeKind::Param => 1,
            _ => 0,
        };

        (self.kind, sub)
    }

    /// Matches one path segment against this parameter edge. Returns the
    /// capture values in key order, or `None` when the compiled constraint
    /// rejects the segment. Unconstrained parameters capture the segment
    /// whole.
    pub(crate) fn param_match<'p>(&self, segment: &'p str) -> Option<SmallVec<[&'p str; 2]>> {
        match &self.param_regex {
            None => Some(smallvec::smallvec![segment]),
            Some(regex) => regex.captures(segment).map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|group| group.map_or("", |m| m.as_str()))
                    .collect()
            }),
        }
    }
}

/// Conflict between a new wildcard unit and one already occupying the same
/// position. `path` is the not-yet-consumed remainder of the pattern being
/// inserted; only its first segment names the offender.
pub(crate) fn wild_path_conflict(
    full_path: &str,
    path: &str,
    existing_path: &str,
) -> RouterError {
    let seg = &path[..crate::path::segment_end_index(path)];
    let at = full_path.find(seg).unwrap_or(0);
    let prefix = format!("{}{}", &full_path[..at], existing_path);

    RouterError::new(
        RouterErrorCode::WildcardConflict,
        format!(
            "'{seg}' in new path '{full_path}' conflicts with existing wildcard \
             '{existing_path}' in existing prefix '{prefix}'"
        ),
        Some(json!({ "path": full_path, "existing": existing_path })),
    )
}
