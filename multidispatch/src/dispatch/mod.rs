//! Multiple dispatch over positional arguments.
//!
//! Each operation name owns a [`DispatchTree`]: a trie keyed by parameter
//! types. A call walks the trie by conformance, collects every matching
//! leaf and, when several match, lets the [specificity
//! resolver](most_specific) pick the most specific one.
//!
//! Set `MULTIDISPATCH_DEBUG` to log every dispatch decision at debug level.

mod dispatcher;
mod error;
mod resolver;
mod signature;
mod tree;


pub use dispatcher::{Dispatcher, Method, MultiMethod};
pub use error::DispatchError;
pub use resolver::{most_specific, Resolution};
pub use signature::{Annotation, Param, Signature};
pub use tree::{DispatchStats, DispatchTree, Leaf};

/// Check if per-call dispatch logging is enabled via `MULTIDISPATCH_DEBUG`.
pub(crate) fn debug_enabled() -> bool {
    use std::sync::OnceLock;
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("MULTIDISPATCH_DEBUG").is_ok_and(|v| !v.is_empty() && v != "0")
    })
}
