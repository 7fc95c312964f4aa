//! multidispatch runtime library
//!
//! This crate provides the dynamically-typed host values that types
//! are checked against and dispatch is performed on. It includes:
//!
//! - `Value` enum for dynamic values
//! - `NativeKind` / `ValueKind` and the native kind hierarchy
//! - `ClassRef` for user-defined classes with base classes
//! - `RuntimeError` for error handling
//! - Per-kind conversion (cast) primitives

pub mod class;
pub mod convert;
pub mod error;
pub mod kind;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use multidispatch_runtime::prelude::*;
/// ```
pub mod prelude {
    pub use super::class::{ClassRef, Instance};
    pub use super::error::{RuntimeError, RuntimeResult};
    pub use super::kind::{NativeKind, ValueKind};
    pub use super::value::{FunctionRef, Value};
}

pub use prelude::*;
