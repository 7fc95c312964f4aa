//! multidispatch: a subtyping poset of runtime types and multiple dispatch
//! over dynamic values.
//!
//! # Crates
//!
//! - `multidispatch_runtime`: the dynamic [`Value`] model and value kinds
//! - `multidispatch_syntax`: the annotation lexer and parser
//! - `multidispatch` (this crate): type nodes, the subtype relation,
//!   conformance, canonicalization and dispatch
//!
//! # Example
//!
//! ```
//! use multidispatch::prelude::*;
//!
//! let mut group = Dispatcher::new();
//! group.define_class("Shape", &[]).unwrap();
//! let circle = group.define_class("Circle", &["Shape"]).unwrap();
//!
//! let area = group
//!     .register("area", &[Param::annotated("s", "Shape")], |_| Ok(Value::Float(0.0)), 0)
//!     .unwrap();
//! group
//!     .register(
//!         "area",
//!         &[Param::annotated("c", "Circle")],
//!         |args| {
//!             let r = args[0].as_instance().and_then(|o| o.field("r").ok()).and_then(Value::as_float);
//!             Ok(Value::Float(3.0 * r.unwrap_or(0.0) * r.unwrap_or(0.0)))
//!         },
//!         0,
//!     )
//!     .unwrap();
//!
//! let c = circle.instantiate([("r", Value::Float(2.0))]);
//! assert_eq!(area.call(&[c]).unwrap(), Value::Float(12.0));
//! ```

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod types;

pub use api::{assert_conforms, cast, conforms, is_subtype};
pub use config::{ConfigError, DispatchConfig};
pub use dispatch::{DispatchError, Dispatcher, MultiMethod, Param, Signature};
pub use error::{Error, Result};
pub use multidispatch_runtime::Value;
pub use types::{ConformanceMismatch, Type, TypeError, TypeRegistry};

/// Get the version string
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Common imports
pub mod prelude {
    pub use crate::api::{assert_conforms, cast, conforms, is_subtype};
    pub use crate::dispatch::{Dispatcher, MultiMethod, Param};
    pub use crate::types::builtins::*;
    pub use crate::types::{Type, TypeRegistry};
    pub use crate::Error;
    pub use multidispatch_runtime::{ClassRef, RuntimeError, Value};
}
