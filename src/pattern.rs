use regex::Regex;
use serde_json::json;
use smallvec::SmallVec;

use crate::errors::{RouterError, RouterErrorCode, RouterResult};
use crate::path::segment_end_index;
use crate::radix::NodeKind;

/// One wildcard unit located inside a pattern, widened to cover the whole
/// path segment it sits in. `path` is the matched source text, `start..end`
/// its byte range in the scanned string, `keys` the capture names in
/// declaration order. `pattern` is the unanchored regex source synthesised
/// from the unit(s) plus intervening literal text; `regex` is its anchored
/// compilation (absent for a single unconstrained `{name}` and for
/// catch-alls).
#[derive(Debug)]
pub(crate) struct WildSegment {
    pub path: String,
    pub keys: SmallVec<[String; 2]>,
    pub start: usize,
    pub end: usize,
    pub kind: NodeKind,
    pub pattern: String,
    pub regex: Option<Regex>,
}

/// Compiles a segment constraint. `^`/`$` semantics are the whole segment,
/// so the source is anchored here and never re-parsed during lookup.
pub(crate) fn compile_segment_regex(pattern: &str, full_path: &str) -> RouterResult<Regex> {
    Regex::new(&format!("^{pattern}$")).map_err(|err| {
        RouterError::new(
            RouterErrorCode::InvalidRegex,
            format!("invalid regex pattern '{pattern}' in path '{full_path}': {err}"),
            Some(json!({ "path": full_path, "pattern": pattern })),
        )
    })
}

/// Scans `path` for the first wildcard unit `{name}`, `{name:regex}` or
/// `{name:*}` and returns its descriptor, or `None` when the path is purely
/// static. `full_path` is only used for error messages.
///
/// A `{` nested inside the unit is only legal after the `:` of a regex
/// constraint (so `{id:[0-9]{3}}` lexes); nesting depth is tracked so the
/// closing brace is matched correctly. When the unit is followed by more
/// text in the same segment, the scan re-enters itself and folds everything
/// up to the next `/` into a single multi-capture descriptor.
pub(crate) fn find_wild_segment(
    path: &str,
    full_path: &str,
) -> RouterResult<Option<WildSegment>> {
    let bytes = path.as_bytes();

    for start in 0..bytes.len() {
        if bytes[start] != b'{' {
            continue;
        }

        let mut with_regex = false;
        let mut depth = 0usize;

        for (off, &c) in bytes[start + 1..].iter().enumerate() {
            match c {
                b'}' => {
                    if depth > 0 {
                        depth -= 1;
                        continue;
                    }

                    let end = start + off + 2;

                    if bytes.len() > end && bytes[end] == b'{' {
                        return Err(RouterError::new(
                            RouterErrorCode::AdjacentWildcards,
                            "the wildcards must be separated by at least 1 char".to_string(),
                            Some(json!({ "path": full_path })),
                        ));
                    }

                    let mut wild = WildSegment {
                        path: path[start..end].to_string(),
                        keys: SmallVec::new(),
                        start,
                        end,
                        kind: NodeKind::Param,
                        pattern: String::new(),
                        regex: None,
                    };

                    let name = &path[start + 1..end - 1];
                    match name.split_once(':') {
                        Some((key, constraint)) => {
                            wild.keys.push(key.to_string());

                            if constraint == "*" {
                                wild.pattern = constraint.to_string();
                                wild.kind = NodeKind::Wildcard;
                            } else {
                                wild.pattern = format!("({constraint})");
                                wild.regex =
                                    Some(compile_segment_regex(&wild.pattern, full_path)?);
                            }
                        }
                        None => {
                            wild.keys.push(name.to_string());
                            wild.pattern = "(.*)".to_string();
                        }
                    }

                    if wild.keys[0].is_empty() {
                        return Err(RouterError::new(
                            RouterErrorCode::EmptyWildcardName,
                            format!(
                                "wildcards must be named with a non-empty name in path '{full_path}'"
                            ),
                            Some(json!({ "path": full_path })),
                        ));
                    }

                    let seg_end = end + segment_end_index(&path[end..]);
                    let rest = &path[end..seg_end];

                    if !rest.is_empty() {
                        // Fold the segment remainder into this descriptor.
                        match find_wild_segment(rest, full_path)? {
                            Some(next) => {
                                let prefix = &rest[..next.start];

                                wild.end += next.end;
                                wild.path.push_str(prefix);
                                wild.path.push_str(&next.path);
                                wild.pattern.push_str(prefix);
                                wild.pattern.push_str(&next.pattern);
                                wild.keys.extend(next.keys);
                            }
                            None => {
                                wild.path.push_str(rest);
                                wild.pattern.push_str(rest);
                                wild.end += rest.len();
                            }
                        }

                        wild.regex = Some(compile_segment_regex(&wild.pattern, full_path)?);
                    }

                    return Ok(Some(wild));
                }
                b':' => with_regex = true,
                b'{' => {
                    if !with_regex && depth == 0 {
                        return Err(RouterError::new(
                            RouterErrorCode::BraceInParamName,
                            "the char '{' is not allowed in the param name".to_string(),
                            Some(json!({ "path": full_path })),
                        ));
                    }

                    depth += 1;
                }
                _ => {}
            }
        }
    }

    Ok(None)
}
