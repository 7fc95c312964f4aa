//! Declared parameters and the signatures they expand to.

use std::fmt;

use multidispatch_runtime::Value;
use serde::{Serialize, Serializer};

use super::error::DispatchError;
use crate::types::{Type, TypeRegistry, TypeResult};

/// Ordered parameter types of one registered implementation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<Type>);

impl Signature {
    pub fn new(types: impl IntoIterator<Item = Type>) -> Self {
        Signature(types.into_iter().collect())
    }

    pub fn types(&self) -> &[Type] {
        &self.0
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Whether every parameter type is decided by value kind alone
    pub fn is_kind_determined(&self) -> bool {
        self.0.iter().all(Type::is_kind_determined)
    }

    /// `(::Int, ::Str)` as used in dispatch messages
    pub fn call_form(&self) -> String {
        let types: Vec<_> = self.0.iter().map(|t| format!("::{}", t)).collect();
        format!("({})", types.join(", "))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, ")")
    }
}

/// Serialized as the list of canonical annotation texts
impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(ToString::to_string))
    }
}

impl From<Vec<Type>> for Signature {
    fn from(types: Vec<Type>) -> Self {
        Signature(types)
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, Default)]
pub enum Annotation {
    /// No annotation; accepts everything
    #[default]
    Absent,
    /// Annotation text, canonicalized at registration
    Text(String),
    /// Already-built type
    Type(Type),
}

impl Annotation {
    pub fn resolve(&self, registry: &TypeRegistry) -> TypeResult<Type> {
        match self {
            Annotation::Absent => Ok(Type::top()),
            Annotation::Text(text) => registry.resolve(text),
            Annotation::Type(ty) => Ok(ty.clone()),
        }
    }
}

/// One declared positional parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub annotation: Annotation,
    pub default: Option<Value>,
}

impl Param {
    /// Unannotated parameter
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            annotation: Annotation::Absent,
            default: None,
        }
    }

    /// Parameter annotated with text such as `"List[int]"`
    pub fn annotated(name: &str, annotation: &str) -> Self {
        Self {
            annotation: Annotation::Text(annotation.to_string()),
            ..Self::new(name)
        }
    }

    /// Parameter annotated with a built type
    pub fn typed(name: &str, ty: Type) -> Self {
        Self {
            annotation: Annotation::Type(ty),
            ..Self::new(name)
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A signature plus the trailing defaults its callers omit
#[derive(Debug, Clone)]
pub(crate) struct FamilyMember {
    pub signature: Signature,
    pub defaults: Vec<Value>,
}

/// Full signature followed by one shorter signature per trailing default
///
/// `f(x: int, y: int = 1, z: int = 2)` yields `(Int, Int, Int)`,
/// `(Int, Int)` filling `z`, and `(Int)` filling `y` and `z`.
pub(crate) fn arity_family(
    name: &str,
    params: &[Param],
    types: &[Type],
) -> Result<Vec<FamilyMember>, DispatchError> {
    let first_default = params.iter().position(|p| p.default.is_some());
    if let Some(start) = first_default {
        if let Some(bad) = params[start..].iter().find(|p| p.default.is_none()) {
            return Err(DispatchError::NonTrailingDefault {
                name: name.to_string(),
                param: bad.name.clone(),
            });
        }
    }

    let mut family = vec![FamilyMember {
        signature: Signature::new(types.iter().cloned()),
        defaults: Vec::new(),
    }];
    if let Some(start) = first_default {
        for len in (start..params.len()).rev() {
            let defaults = params[len..]
                .iter()
                .filter_map(|p| p.default.clone())
                .collect();
            family.push(FamilyMember {
                signature: Signature::new(types[..len].iter().cloned()),
                defaults,
            });
        }
    }
    Ok(family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::builtins::{ANY, INT, STR};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_family_without_defaults() {
        let params = [Param::annotated("x", "int")];
        let family = arity_family("f", &params, &[INT.clone()]).unwrap();
        assert_eq!(family.len(), 1);
        assert_eq!(family[0].signature.arity(), 1);
    }

    #[test]
    fn test_family_with_trailing_defaults() {
        let params = [
            Param::annotated("x", "int"),
            Param::annotated("y", "str").with_default("a"),
            Param::new("z").with_default(3),
        ];
        let types = [INT.clone(), STR.clone(), ANY.clone()];
        let family = arity_family("f", &params, &types).unwrap();
        let arities: Vec<usize> = family.iter().map(|m| m.signature.arity()).collect();
        assert_eq!(arities, vec![3, 2, 1]);
        assert_eq!(family[1].defaults, vec![Value::Int(3)]);
        assert_eq!(family[2].defaults, vec![Value::str("a"), Value::Int(3)]);
    }

    #[test]
    fn test_non_trailing_default_rejected() {
        let params = [Param::new("x").with_default(1), Param::new("y")];
        let err = arity_family("f", &params, &[ANY.clone(), ANY.clone()]).unwrap_err();
        assert!(matches!(err, DispatchError::NonTrailingDefault { ref param, .. } if param == "y"));
    }

    #[test]
    fn test_signature_rendering() {
        let sig = Signature::new([INT.clone(), STR.clone()]);
        assert_eq!(sig.to_string(), "(Int, Str)");
        assert_eq!(sig.call_form(), "(::Int, ::Str)");
        assert_eq!(
            serde_json::to_string(&sig).unwrap(),
            r#"["Int","Str"]"#
        );
    }
}
