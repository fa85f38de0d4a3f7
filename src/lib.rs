//! Compressed radix tree for HTTP path routing.
//!
//! Patterns combine literal text, named parameters and catch-alls:
//!
//! - `/users/admin` matches itself byte-for-byte.
//! - `/users/{id}` captures one segment under `id`.
//! - `/api/{version:v[0-9]+}` constrains the segment with a regex compiled
//!   once at registration; several units may share a segment
//!   (`/prefix{v:V[0-9]}_{n:[a-z]+}_sufix`).
//! - `/static/{filepath:*}` captures the whole remainder, slashes included.
//!
//! Lookup resolves with static-before-parameter priority, binds captures
//! into a caller-supplied [`CaptureSink`], and signals trailing-slash
//! redirects instead of silently matching them. A second, case-insensitive
//! walk reconstructs the canonical registered path for mis-cased requests.
//!
//! ```
//! use radixmux::{Params, Tree};
//!
//! let mut tree = Tree::new();
//! tree.add("GET", "/users/{name}", 1).unwrap();
//!
//! let mut params = Params::new();
//! let (handler, tsr) = tree.get("GET", "/users/atreugo", Some(&mut params));
//! assert_eq!(handler, Some(&1));
//! assert!(!tsr);
//! assert_eq!(params.get("name"), Some("atreugo"));
//! ```

mod errors;
mod params;
mod path;
mod pattern;
mod radix;
mod tree;

pub use errors::{RouterError, RouterErrorCode, RouterResult};
pub use params::{CaptureSink, NoopSink, Params};
pub use tree::{Tree, METHOD_WILD};
