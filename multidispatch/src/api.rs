//! Free-function surface over the type poset.
//!
//! These are the calls a record validation layer makes per field.

use multidispatch_runtime::Value;

use crate::types::{ConformanceMismatch, Type};

/// `a <= b`
pub fn is_subtype(a: &Type, b: &Type) -> bool {
    a.is_subtype_of(b)
}

/// Does `value` belong to `ty`?
pub fn conforms(value: &Value, ty: &Type) -> bool {
    ty.test_instance(value)
}

/// Fail with the first offending (sub-value, sub-type) pair
///
/// # Examples
/// ```
/// use multidispatch::{assert_conforms, types::TypeRegistry};
/// use multidispatch_runtime::Value;
///
/// let ty = TypeRegistry::new().resolve("List[int]").unwrap();
/// let err = assert_conforms(&Value::list([Value::Int(1), Value::str("x")]), &ty).unwrap_err();
/// assert_eq!(err.path_string(), "[1]");
/// ```
pub fn assert_conforms(value: &Value, ty: &Type) -> Result<(), ConformanceMismatch> {
    ty.validate_instance(value)
}

/// Coerce `value` into `ty`
pub fn cast(value: &Value, ty: &Type) -> Result<Value, ConformanceMismatch> {
    ty.cast(value)
}
