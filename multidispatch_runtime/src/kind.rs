//! Value kinds
//!
//! Every runtime value has exactly one concrete kind. Native kinds form a
//! single-parent hierarchy with a few abstract kinds (`Number`, `Sequence`,
//! `Mapping`, `Iterable`) that no value has directly. User classes form
//! their own hierarchy through their base classes.

use std::fmt;

use crate::class::ClassRef;

/// Built-in value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NativeKind {
    None,
    Bool,
    Int,
    Float,
    Number,
    Str,
    Bytes,
    List,
    Tuple,
    Dict,
    Set,
    FrozenSet,
    Sequence,
    Mapping,
    Iterable,
    Callable,
}

impl NativeKind {
    /// All native kinds, concrete and abstract
    pub const ALL: [NativeKind; 16] = [
        NativeKind::None,
        NativeKind::Bool,
        NativeKind::Int,
        NativeKind::Float,
        NativeKind::Number,
        NativeKind::Str,
        NativeKind::Bytes,
        NativeKind::List,
        NativeKind::Tuple,
        NativeKind::Dict,
        NativeKind::Set,
        NativeKind::FrozenSet,
        NativeKind::Sequence,
        NativeKind::Mapping,
        NativeKind::Iterable,
        NativeKind::Callable,
    ];

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            NativeKind::None => "None",
            NativeKind::Bool => "Bool",
            NativeKind::Int => "Int",
            NativeKind::Float => "Float",
            NativeKind::Number => "Number",
            NativeKind::Str => "Str",
            NativeKind::Bytes => "Bytes",
            NativeKind::List => "List",
            NativeKind::Tuple => "Tuple",
            NativeKind::Dict => "Dict",
            NativeKind::Set => "Set",
            NativeKind::FrozenSet => "FrozenSet",
            NativeKind::Sequence => "Sequence",
            NativeKind::Mapping => "Mapping",
            NativeKind::Iterable => "Iterable",
            NativeKind::Callable => "Callable",
        }
    }

    /// Direct parent in the native hierarchy
    pub fn parent(&self) -> Option<NativeKind> {
        match self {
            NativeKind::Bool => Some(NativeKind::Int),
            NativeKind::Int | NativeKind::Float => Some(NativeKind::Number),
            NativeKind::Str | NativeKind::Bytes | NativeKind::List | NativeKind::Tuple => {
                Some(NativeKind::Sequence)
            }
            NativeKind::Dict => Some(NativeKind::Mapping),
            NativeKind::Sequence
            | NativeKind::Mapping
            | NativeKind::Set
            | NativeKind::FrozenSet => Some(NativeKind::Iterable),
            NativeKind::None | NativeKind::Number | NativeKind::Iterable | NativeKind::Callable => {
                None
            }
        }
    }

    /// Check if `self` is `other` or one of its descendants
    pub fn is_subkind_of(&self, other: &NativeKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == *other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Abstract kinds are never the kind of a concrete value
    pub fn is_abstract(&self) -> bool {
        matches!(
            self,
            NativeKind::Number | NativeKind::Sequence | NativeKind::Mapping | NativeKind::Iterable
        )
    }

    /// Kinds whose values hold other values as elements
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NativeKind::List
                | NativeKind::Tuple
                | NativeKind::Dict
                | NativeKind::Set
                | NativeKind::FrozenSet
                | NativeKind::Sequence
                | NativeKind::Mapping
                | NativeKind::Iterable
        )
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The kind of a runtime value: a native kind or a user class
///
/// Kinds are cheap to clone and hash, and are used as resolution cache
/// keys. Class kinds compare by class identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Native(NativeKind),
    Class(ClassRef),
}

impl ValueKind {
    pub fn name(&self) -> &str {
        match self {
            ValueKind::Native(kind) => kind.name(),
            ValueKind::Class(class) => class.name(),
        }
    }

    /// Subkind test across both hierarchies (natives and classes never mix)
    pub fn is_subkind_of(&self, other: &ValueKind) -> bool {
        match (self, other) {
            (ValueKind::Native(a), ValueKind::Native(b)) => a.is_subkind_of(b),
            (ValueKind::Class(a), ValueKind::Class(b)) => a.is_subclass_of(b),
            _ => false,
        }
    }

    pub fn as_native(&self) -> Option<NativeKind> {
        match self {
            ValueKind::Native(kind) => Some(*kind),
            ValueKind::Class(_) => None,
        }
    }
}

impl From<NativeKind> for ValueKind {
    fn from(kind: NativeKind) -> Self {
        ValueKind::Native(kind)
    }
}

impl From<ClassRef> for ValueKind {
    fn from(class: ClassRef) -> Self {
        ValueKind::Class(class)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_tower() {
        assert!(NativeKind::Bool.is_subkind_of(&NativeKind::Int));
        assert!(NativeKind::Bool.is_subkind_of(&NativeKind::Number));
        assert!(NativeKind::Float.is_subkind_of(&NativeKind::Number));
        assert!(!NativeKind::Float.is_subkind_of(&NativeKind::Int));
        assert!(!NativeKind::Int.is_subkind_of(&NativeKind::Bool));
    }

    #[test]
    fn test_collections() {
        assert!(NativeKind::List.is_subkind_of(&NativeKind::Sequence));
        assert!(NativeKind::Str.is_subkind_of(&NativeKind::Iterable));
        assert!(NativeKind::Dict.is_subkind_of(&NativeKind::Mapping));
        assert!(NativeKind::Set.is_subkind_of(&NativeKind::Iterable));
        assert!(!NativeKind::Set.is_subkind_of(&NativeKind::Sequence));
        assert!(!NativeKind::Dict.is_subkind_of(&NativeKind::Sequence));
    }

    #[test]
    fn test_reflexive_for_all_kinds() {
        for kind in NativeKind::ALL {
            assert!(kind.is_subkind_of(&kind), "{} should be a subkind of itself", kind);
        }
    }

    #[test]
    fn test_classes_and_natives_never_mix() {
        let shape = ClassRef::new("Shape", []);
        assert!(!ValueKind::Class(shape.clone()).is_subkind_of(&NativeKind::Iterable.into()));
        assert!(!ValueKind::Native(NativeKind::Int).is_subkind_of(&ValueKind::Class(shape)));
    }

    #[test]
    fn test_abstract_kinds() {
        let abstract_kinds: Vec<_> = NativeKind::ALL
            .iter()
            .filter(|k| k.is_abstract())
            .map(|k| k.name())
            .collect();
        assert_eq!(abstract_kinds, vec!["Number", "Sequence", "Mapping", "Iterable"]);
    }
}
