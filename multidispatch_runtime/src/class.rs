//! User-defined classes and their instances

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;

#[derive(Debug)]
struct ClassInfo {
    name: String,
    bases: Vec<ClassRef>,
}

/// Shared handle to a user class
///
/// Classes compare and hash by identity: two classes declared with the
/// same name are still distinct kinds.
#[derive(Clone)]
pub struct ClassRef(Arc<ClassInfo>);

impl ClassRef {
    /// Declare a class with the given base classes
    pub fn new(name: impl Into<String>, bases: impl IntoIterator<Item = ClassRef>) -> Self {
        ClassRef(Arc::new(ClassInfo {
            name: name.into(),
            bases: bases.into_iter().collect(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn bases(&self) -> &[ClassRef] {
        &self.0.bases
    }

    /// Check if `self` is `other` or inherits from it, directly or not
    pub fn is_subclass_of(&self, other: &ClassRef) -> bool {
        self == other || self.0.bases.iter().any(|base| base.is_subclass_of(other))
    }

    /// Linearized ancestry: self first, then bases depth-first without repeats
    pub fn ancestors(&self) -> Vec<ClassRef> {
        let mut out: Vec<ClassRef> = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(class) = stack.pop() {
            if out.contains(&class) {
                continue;
            }
            stack.extend(class.0.bases.iter().rev().cloned());
            out.push(class);
        }
        out
    }

    /// Create an instance of this class with the given fields
    pub fn instantiate<K: Into<String>>(
        &self,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Value {
        Value::Object(Arc::new(Instance {
            class: self.clone(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }))
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", self.0.name)
    }
}

/// An instance of a user class
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class: ClassRef,
    pub fields: Vec<(String, Value)>,
}

impl Instance {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> RuntimeResult<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
            .ok_or_else(|| RuntimeError::field_error(name, self.class.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subclass_chain() {
        let shape = ClassRef::new("Shape", []);
        let polygon = ClassRef::new("Polygon", [shape.clone()]);
        let square = ClassRef::new("Square", [polygon.clone()]);
        assert!(square.is_subclass_of(&shape));
        assert!(square.is_subclass_of(&square));
        assert!(!shape.is_subclass_of(&square));
    }

    #[test]
    fn test_identity_not_name() {
        let a = ClassRef::new("Point", []);
        let b = ClassRef::new("Point", []);
        assert_ne!(a, b);
        assert!(!a.is_subclass_of(&b));
    }

    #[test]
    fn test_ancestors_diamond() {
        let base = ClassRef::new("Base", []);
        let left = ClassRef::new("Left", [base.clone()]);
        let right = ClassRef::new("Right", [base.clone()]);
        let child = ClassRef::new("Child", [left, right]);
        let names: Vec<_> = child.ancestors().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["Child", "Left", "Base", "Right"]);
    }

    #[test]
    fn test_field_lookup() {
        let circle = ClassRef::new("Circle", []);
        let value = circle.instantiate([("r", Value::Float(2.0))]);
        let instance = value.as_instance().unwrap();
        assert_eq!(instance.field("r").unwrap(), &Value::Float(2.0));
        assert_eq!(
            instance.field("s").unwrap_err(),
            RuntimeError::field_error("s", "Circle")
        );
    }
}
