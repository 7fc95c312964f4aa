//! Type nodes.
//!
//! A [`Type`] is a cheap, shareable handle to an immutable [`TypeNode`].
//! Nodes are never mutated after construction, hash structurally, and are
//! used directly as dispatch-trie edge keys.
//!
//! ```text
//! Top (Any)                      absorbing supertype
//! Wildcard (?)                   compatible with everything, both ways
//! Atomic(kind)                   native kind or user class
//! Generic { base, item, var }    List[Int], Dict[Str, Int]
//! Product([..])                  Tuple[Int, Str]
//! Sum([..])                      Int | Str
//! Phantom { marker, item }       transparent wrapper
//! Constraint { base, preds }     Int(min=0)
//! Literal([..])                  Literal[1, "a"]
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use multidispatch_runtime::{ClassRef, NativeKind, Value, ValueKind};
use serde::{Deserialize, Serialize};

use super::builtins;
use super::error::TypeError;
use super::predicate::Predicate;

/// Variance annotation for generic parameters.
///
/// - **Covariant**: `T <= S` implies `C[T] <= C[S]`
/// - **Contravariant**: `T <= S` implies `C[S] <= C[T]`
/// - **Invariant**: `C[T] <= C[S]` only when `T == S`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Variance {
    Covariant,
    Contravariant,
    #[default]
    Invariant,
}

/// Scalar values that can appear in a `Literal` type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl LiteralValue {
    /// Membership test against a runtime value (bools never equal ints)
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (LiteralValue::None, Value::None) => true,
            (LiteralValue::Bool(a), Value::Bool(b)) => a == b,
            (LiteralValue::Int(a), Value::Int(b)) => a == b,
            (LiteralValue::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            LiteralValue::None => Value::None,
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Int(n) => Value::Int(*n),
            LiteralValue::Str(s) => Value::Str(s.clone()),
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(LiteralValue::None),
            Value::Bool(b) => Some(LiteralValue::Bool(*b)),
            Value::Int(n) => Some(LiteralValue::Int(*n)),
            Value::Str(s) => Some(LiteralValue::Str(s.clone())),
            _ => None,
        }
    }
}

/// The closed set of type variants
#[derive(Debug)]
pub enum TypeNode {
    /// Universal absorbing supertype
    Top,
    /// Bidirectionally compatible element
    Wildcard,
    /// A native kind or user class, tested by kind
    Atomic(ValueKind),
    /// Parameterized container; `base` is always an atomic type
    Generic {
        base: Type,
        item: Type,
        variance: Variance,
    },
    /// Fixed-arity tuple of positional types
    Product(Vec<Type>),
    /// Deduplicated, flattened alternatives (empty is the bottom type)
    Sum(Vec<Type>),
    /// Transparent metadata wrapper
    Phantom { marker: Arc<str>, item: Type },
    /// Base type refined by predicates
    Constraint {
        base: Type,
        predicates: Vec<Predicate>,
    },
    /// Finite set of scalar values
    Literal(Vec<LiteralValue>),
}

/// Shared handle to an immutable type node
#[derive(Clone)]
pub struct Type(Arc<TypeNode>);

impl Type {
    pub(crate) fn from_node(node: TypeNode) -> Self {
        Type(Arc::new(node))
    }

    /// The underlying node
    pub fn node(&self) -> &TypeNode {
        &self.0
    }

    /// Check if two handles share one node
    pub fn ptr_eq(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // ==================== Constructors ====================

    /// The top element (`Any`)
    pub fn top() -> Type {
        builtins::ANY.clone()
    }

    /// The wildcard element (`?`)
    pub fn wildcard() -> Type {
        builtins::WILDCARD.clone()
    }

    /// The empty union, a subtype of everything and matched by nothing
    pub fn never() -> Type {
        builtins::NEVER.clone()
    }

    /// Atomic type for a native kind or class
    pub fn atomic(kind: impl Into<ValueKind>) -> Type {
        Type::from_node(TypeNode::Atomic(kind.into()))
    }

    /// Atomic type for a user class
    pub fn class(class: &ClassRef) -> Type {
        Type::atomic(class.clone())
    }

    /// Parameterized container over an atomic base
    ///
    /// A generic base is unwrapped to its own base, so `generic(List, Int)`
    /// and `generic(List[Any], Int)` build the same node.
    pub fn generic(base: Type, item: Type, variance: Variance) -> Type {
        let base = match base.node() {
            TypeNode::Generic { base, .. } => base.clone(),
            _ => base,
        };
        Type::from_node(TypeNode::Generic {
            base,
            item,
            variance,
        })
    }

    /// Fixed-arity product; arity and position are kept as given
    pub fn product(items: impl IntoIterator<Item = Type>) -> Type {
        Type::from_node(TypeNode::Product(items.into_iter().collect()))
    }

    /// Canonical union of the given alternatives
    ///
    /// Nested sums are flattened and duplicates dropped. Any top member
    /// absorbs the whole union, and a single remaining alternative is
    /// returned bare.
    ///
    /// # Examples
    /// ```
    /// use multidispatch::types::{builtins::{ANY, INT, STR}, Type};
    ///
    /// assert_eq!(Type::union([INT.clone(), INT.clone()]), *INT);
    /// assert_eq!(Type::union([INT.clone(), ANY.clone()]), *ANY);
    /// assert_eq!(Type::union([INT.clone(), STR.clone()]).to_string(), "Int | Str");
    /// ```
    pub fn union(types: impl IntoIterator<Item = Type>) -> Type {
        let mut alternatives: Vec<Type> = Vec::new();
        for ty in types {
            match ty.node() {
                TypeNode::Top => return Type::top(),
                TypeNode::Sum(inner) => {
                    for alt in inner {
                        push_unique(&mut alternatives, alt.clone());
                    }
                }
                _ => push_unique(&mut alternatives, ty),
            }
        }
        if alternatives.len() == 1 {
            if let Some(only) = alternatives.pop() {
                return only;
            }
        }
        Type::from_node(TypeNode::Sum(alternatives))
    }

    /// `T | None`
    pub fn optional(ty: Type) -> Type {
        Type::union([ty, builtins::NONE.clone()])
    }

    /// Transparent wrapper tagged with `marker`
    pub fn phantom(marker: &str, item: Type) -> Type {
        Type::from_node(TypeNode::Phantom {
            marker: Arc::from(marker),
            item,
        })
    }

    /// Unparameterized phantom root (wraps the top element)
    pub fn phantom_root(marker: &str) -> Type {
        Type::phantom(marker, Type::top())
    }

    /// Refine `base` with predicates
    ///
    /// Refining a constraint extends its predicate list instead of nesting.
    pub fn constrained(base: Type, predicates: impl IntoIterator<Item = Predicate>) -> Type {
        let mut predicates: Vec<Predicate> = predicates.into_iter().collect();
        if predicates.is_empty() {
            return base;
        }
        let base = match base.node() {
            TypeNode::Constraint {
                base: inner,
                predicates: existing,
            } => {
                let mut merged = existing.clone();
                merged.append(&mut predicates);
                predicates = merged;
                inner.clone()
            }
            _ => base,
        };
        Type::from_node(TypeNode::Constraint { base, predicates })
    }

    /// Finite set of literal values (duplicates dropped)
    pub fn literal(values: impl IntoIterator<Item = LiteralValue>) -> Type {
        let mut unique: Vec<LiteralValue> = Vec::new();
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        Type::from_node(TypeNode::Literal(unique))
    }

    /// Re-parameterize a generic (or phantom) type with a narrower item
    ///
    /// The new item must be a subtype of the current one, so `List[Int]`
    /// can be built from `List` but `List[Int]` cannot become `List[Str]`.
    pub fn parameterize(&self, item: Type) -> Result<Type, TypeError> {
        match self.node() {
            TypeNode::Generic {
                base,
                item: bound,
                variance,
            } => {
                if !item.is_subtype_of(bound) {
                    return Err(TypeError::InvalidParameter {
                        base: self.to_string(),
                        item: item.to_string(),
                        bound: bound.to_string(),
                    });
                }
                Ok(Type::generic(base.clone(), item, *variance))
            }
            TypeNode::Phantom {
                marker,
                item: bound,
            } => {
                if !item.is_subtype_of(bound) {
                    return Err(TypeError::InvalidParameter {
                        base: self.to_string(),
                        item: item.to_string(),
                        bound: bound.to_string(),
                    });
                }
                Ok(Type::phantom(marker, item))
            }
            TypeNode::Atomic(ValueKind::Native(kind)) if kind.is_container() => {
                Ok(Type::generic(self.clone(), item, Variance::Covariant))
            }
            _ => Err(TypeError::NotGeneric {
                name: self.to_string(),
            }),
        }
    }

    /// Same generic with a different variance tag
    pub fn with_variance(&self, variance: Variance) -> Type {
        match self.node() {
            TypeNode::Generic { base, item, .. } => {
                Type::generic(base.clone(), item.clone(), variance)
            }
            _ => self.clone(),
        }
    }

    // ==================== Predicates ====================

    pub fn is_top(&self) -> bool {
        matches!(self.node(), TypeNode::Top)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.node(), TypeNode::Wildcard)
    }

    pub fn is_never(&self) -> bool {
        matches!(self.node(), TypeNode::Sum(alts) if alts.is_empty())
    }

    /// Native kind of an atomic type
    pub fn native_kind(&self) -> Option<NativeKind> {
        match self.node() {
            TypeNode::Atomic(kind) => kind.as_native(),
            _ => None,
        }
    }

    /// Alternatives of a sum type
    pub fn alternatives(&self) -> Option<&[Type]> {
        match self.node() {
            TypeNode::Sum(alts) => Some(alts),
            _ => None,
        }
    }

    /// Items that place no requirement on container elements
    pub(crate) fn is_unconstrained_item(&self) -> bool {
        match self.node() {
            TypeNode::Top | TypeNode::Wildcard => true,
            TypeNode::Product(items) => items.iter().all(Type::is_unconstrained_item),
            _ => false,
        }
    }

    /// Whether conformance depends only on the value's kind
    ///
    /// Dispatch results for such types can be memoized by argument kinds.
    pub fn is_kind_determined(&self) -> bool {
        match self.node() {
            TypeNode::Top | TypeNode::Wildcard | TypeNode::Atomic(_) => true,
            TypeNode::Generic { item, .. } => item.is_unconstrained_item(),
            TypeNode::Sum(alts) => alts.iter().all(Type::is_kind_determined),
            TypeNode::Phantom { item, .. } => item.is_kind_determined(),
            TypeNode::Product(_) | TypeNode::Constraint { .. } | TypeNode::Literal(_) => false,
        }
    }
}

fn push_unique(alternatives: &mut Vec<Type>, ty: Type) {
    if !alternatives.contains(&ty) {
        alternatives.push(ty);
    }
}

// ==================== Structural equality & hashing ====================

fn same_members<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

fn unordered_hash<T: Hash>(items: &[T]) -> u64 {
    items
        .iter()
        .map(|item| {
            let mut hasher = DefaultHasher::new();
            item.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0u64, u64::wrapping_add)
}

impl PartialEq for TypeNode {
    fn eq(&self, other: &Self) -> bool {
        use TypeNode::*;
        match (self, other) {
            (Top, Top) | (Wildcard, Wildcard) => true,
            (Atomic(a), Atomic(b)) => a == b,
            (
                Generic {
                    base: b1, item: i1, ..
                },
                Generic {
                    base: b2, item: i2, ..
                },
            ) => b1 == b2 && i1 == i2,
            (Product(a), Product(b)) => a == b,
            (Sum(a), Sum(b)) => same_members(a, b),
            (
                Phantom {
                    marker: m1,
                    item: i1,
                },
                Phantom {
                    marker: m2,
                    item: i2,
                },
            ) => m1 == m2 && i1 == i2,
            (
                Constraint {
                    base: b1,
                    predicates: p1,
                },
                Constraint {
                    base: b2,
                    predicates: p2,
                },
            ) => b1 == b2 && p1 == p2,
            (Literal(a), Literal(b)) => same_members(a, b),
            _ => false,
        }
    }
}

impl Eq for TypeNode {}

impl Hash for TypeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TypeNode::Top | TypeNode::Wildcard => {}
            TypeNode::Atomic(kind) => kind.hash(state),
            // Variance is not part of identity
            TypeNode::Generic { base, item, .. } => {
                base.hash(state);
                item.hash(state);
            }
            TypeNode::Product(items) => items.hash(state),
            TypeNode::Sum(alts) => unordered_hash(alts).hash(state),
            TypeNode::Phantom { marker, item } => {
                marker.hash(state);
                item.hash(state);
            }
            TypeNode::Constraint { base, predicates } => {
                base.hash(state);
                predicates.hash(state);
            }
            TypeNode::Literal(values) => unordered_hash(values).hash(state),
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self)
    }
}

impl From<NativeKind> for Type {
    fn from(kind: NativeKind) -> Self {
        Type::atomic(kind)
    }
}

impl From<&ClassRef> for Type {
    fn from(class: &ClassRef) -> Self {
        Type::class(class)
    }
}
