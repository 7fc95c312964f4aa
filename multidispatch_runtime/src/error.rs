//! Runtime error types
//!
//! Errors raised by value conversion and by user implementations
//! invoked through dispatch.

use thiserror::Error;

/// Runtime error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Type mismatch error
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Invalid argument error
    #[error("ArgumentError: {0}")]
    ArgumentError(String),

    /// Value could not be converted to the requested kind
    #[error("CastError: cannot convert {value} to {target}")]
    CastFailed {
        /// Representation of the offending value
        value: String,
        /// Name of the target kind
        target: String,
    },

    /// Key not found in dictionary
    #[error("KeyError: key {0} not found")]
    KeyError(String),

    /// Field not found in object
    #[error("FieldError: field {0} not found in type {1}")]
    FieldError(String, String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

impl RuntimeError {
    /// Create a type error
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        RuntimeError::TypeError(msg.into())
    }

    /// Create an argument error
    pub fn argument_error<S: Into<String>>(msg: S) -> Self {
        RuntimeError::ArgumentError(msg.into())
    }

    /// Create a cast error
    pub fn cast_failed<S1: Into<String>, S2: Into<String>>(value: S1, target: S2) -> Self {
        RuntimeError::CastFailed {
            value: value.into(),
            target: target.into(),
        }
    }

    /// Create a key error
    pub fn key_error<S: Into<String>>(key: S) -> Self {
        RuntimeError::KeyError(key.into())
    }

    /// Create a field error
    pub fn field_error<S1: Into<String>, S2: Into<String>>(field: S1, type_name: S2) -> Self {
        RuntimeError::FieldError(field.into(), type_name.into())
    }

    /// Create a custom error
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        RuntimeError::Custom(msg.into())
    }
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
