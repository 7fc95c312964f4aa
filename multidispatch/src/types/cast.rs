//! Type-directed coercion.
//!
//! `cast` is the hook consumed by record validation layers: it coerces a
//! value into a type where an unsurprising conversion exists and fails
//! with the same mismatch `validate_instance` would report otherwise.

use multidispatch_runtime::{Value, ValueKind};

use super::conformance::{accepts, mapping_item, ConformanceMismatch, FullSampler};
use super::node::{Type, TypeNode};

impl Type {
    /// Coerce `value` into this type
    ///
    /// Values that already conform are returned unchanged.
    ///
    /// # Examples
    /// ```
    /// use multidispatch::types::TypeRegistry;
    /// use multidispatch_runtime::Value;
    ///
    /// let registry = TypeRegistry::new();
    /// let ty = registry.resolve("List[int]").unwrap();
    /// let raw = Value::tuple([Value::str("1"), Value::str("2")]);
    /// assert_eq!(ty.cast(&raw).unwrap(), Value::list([Value::Int(1), Value::Int(2)]));
    /// ```
    pub fn cast(&self, value: &Value) -> Result<Value, ConformanceMismatch> {
        match cast_value(self, value) {
            Some(cast) => Ok(cast),
            None => self.validate_instance(value).map(|()| value.clone()),
        }
    }
}

fn cast_value(ty: &Type, value: &Value) -> Option<Value> {
    if accepts(ty, value, &FullSampler) {
        return Some(value.clone());
    }
    match ty.node() {
        TypeNode::Top | TypeNode::Wildcard => Some(value.clone()),
        TypeNode::Atomic(ValueKind::Native(kind)) => kind.cast(value).ok(),
        TypeNode::Atomic(ValueKind::Class(_)) | TypeNode::Literal(_) => None,
        TypeNode::Sum(alts) => alts.iter().find_map(|alt| cast_value(alt, value)),
        TypeNode::Product(items) => {
            let elems = value.elements().filter(|_| {
                matches!(value, Value::Tuple(_) | Value::List(_))
            })?;
            if elems.len() != items.len() {
                return None;
            }
            items
                .iter()
                .zip(elems)
                .map(|(t, v)| cast_value(t, v))
                .collect::<Option<Vec<_>>>()
                .map(Value::Tuple)
        }
        TypeNode::Generic { base, item, .. } => {
            let container = cast_value(base, value)?;
            if item.is_unconstrained_item() {
                return Some(container);
            }
            cast_elements(base, item, container)
        }
        TypeNode::Phantom { item, .. } => cast_value(item, value),
        TypeNode::Constraint { base, predicates } => {
            let cast = cast_value(base, value)?;
            predicates.iter().all(|p| p.test(&cast)).then_some(cast)
        }
    }
}

/// Cast every element of an already kind-correct container
fn cast_elements(base: &Type, item: &Type, container: Value) -> Option<Value> {
    let cast_all = |items: Vec<Value>| {
        items
            .iter()
            .map(|v| cast_value(item, v))
            .collect::<Option<Vec<_>>>()
    };
    match container {
        Value::List(items) => cast_all(items).map(Value::List),
        Value::Tuple(items) => cast_all(items).map(Value::Tuple),
        Value::Set(items) => cast_all(items).map(Value::set),
        Value::FrozenSet(items) => cast_all(items).map(Value::frozenset),
        Value::Dict(entries) => {
            let (key_ty, val_ty) = mapping_item(base, item);
            entries
                .iter()
                .map(|(k, v)| {
                    let k = cast_value(key_ty, k)?;
                    let v = match val_ty {
                        Some(t) => cast_value(t, v)?,
                        None => v.clone(),
                    };
                    Some((k, v))
                })
                .collect::<Option<Vec<_>>>()
                .map(Value::Dict)
        }
        _ => None,
    }
}
