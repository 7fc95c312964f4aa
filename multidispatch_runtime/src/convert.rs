//! Conversion utilities
//!
//! Scalar accessors that fail with a `TypeError`, and the per-native-kind
//! cast primitive used by type-directed coercion.

use crate::error::{RuntimeError, RuntimeResult};
use crate::kind::{NativeKind, ValueKind};
use crate::value::{dedup, Value};

/// Convert a Value to i64
pub fn to_i64(value: &Value) -> RuntimeResult<i64> {
    value.as_int().ok_or_else(|| {
        RuntimeError::type_error(format!("cannot convert {} to Int", value.type_name()))
    })
}

/// Convert a Value to f64
pub fn to_f64(value: &Value) -> RuntimeResult<f64> {
    value.as_float().ok_or_else(|| {
        RuntimeError::type_error(format!("cannot convert {} to Float", value.type_name()))
    })
}

/// Borrow the string contents of a Value
pub fn to_str(value: &Value) -> RuntimeResult<&str> {
    value.as_str().ok_or_else(|| {
        RuntimeError::type_error(format!("cannot convert {} to Str", value.type_name()))
    })
}

fn cast_error(value: &Value, target: NativeKind) -> RuntimeError {
    RuntimeError::cast_failed(value.to_string(), target.name())
}

/// Coerce a value into the given native kind
///
/// Values already of the kind (or of a subkind) are returned unchanged.
/// Otherwise only lossless, unsurprising conversions are attempted:
/// decimal strings to numbers, ints to floats, and between the
/// list/tuple/set container kinds.
pub fn cast_native(value: &Value, target: NativeKind) -> RuntimeResult<Value> {
    if value.kind().is_subkind_of(&ValueKind::Native(target)) {
        return Ok(value.clone());
    }

    match (target, value) {
        (NativeKind::Int, Value::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| cast_error(value, target)),
        (NativeKind::Float, Value::Int(n)) => Ok(Value::Float(*n as f64)),
        (NativeKind::Float, Value::Str(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| cast_error(value, target)),
        (NativeKind::Number, Value::Str(_)) => cast_native(value, NativeKind::Int)
            .or_else(|_| cast_native(value, NativeKind::Float))
            .map_err(|_| cast_error(value, target)),
        (NativeKind::List, _) => match value.elements() {
            Some(items) => Ok(Value::List(items.to_vec())),
            None => Err(cast_error(value, target)),
        },
        (NativeKind::Tuple, _) => match value.elements() {
            Some(items) => Ok(Value::Tuple(items.to_vec())),
            None => Err(cast_error(value, target)),
        },
        (NativeKind::Set, _) => match value.elements() {
            Some(items) => Ok(Value::Set(dedup(items.iter().cloned()))),
            None => Err(cast_error(value, target)),
        },
        (NativeKind::FrozenSet, _) => match value.elements() {
            Some(items) => Ok(Value::FrozenSet(dedup(items.iter().cloned()))),
            None => Err(cast_error(value, target)),
        },
        _ => Err(cast_error(value, target)),
    }
}

impl NativeKind {
    /// Cast hook for this kind; see [`cast_native`]
    pub fn cast(&self, value: &Value) -> RuntimeResult<Value> {
        cast_native(value, *self)
    }
}
