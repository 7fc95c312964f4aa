//! Process-wide shared nodes for the built-in types.
//!
//! Containers are covariant generics whose item is the top element;
//! `DICT` and `MAPPING` carry a `Product[Any, Any]` item for key/value.

use multidispatch_runtime::NativeKind;
use once_cell::sync::Lazy;

use super::node::{Type, TypeNode, Variance};

fn container(kind: NativeKind) -> Type {
    Type::generic(Type::atomic(kind), ANY.clone(), Variance::Covariant)
}

fn mapping(kind: NativeKind) -> Type {
    Type::generic(
        Type::atomic(kind),
        Type::product([ANY.clone(), ANY.clone()]),
        Variance::Covariant,
    )
}

pub static ANY: Lazy<Type> = Lazy::new(|| Type::from_node(TypeNode::Top));
pub static WILDCARD: Lazy<Type> = Lazy::new(|| Type::from_node(TypeNode::Wildcard));
pub static NEVER: Lazy<Type> = Lazy::new(|| Type::from_node(TypeNode::Sum(Vec::new())));

pub static NONE: Lazy<Type> = Lazy::new(|| Type::atomic(NativeKind::None));
pub static BOOL: Lazy<Type> = Lazy::new(|| Type::atomic(NativeKind::Bool));
pub static INT: Lazy<Type> = Lazy::new(|| Type::atomic(NativeKind::Int));
pub static FLOAT: Lazy<Type> = Lazy::new(|| Type::atomic(NativeKind::Float));
pub static NUMBER: Lazy<Type> = Lazy::new(|| Type::atomic(NativeKind::Number));
pub static STR: Lazy<Type> = Lazy::new(|| Type::atomic(NativeKind::Str));
pub static BYTES: Lazy<Type> = Lazy::new(|| Type::atomic(NativeKind::Bytes));
pub static CALLABLE: Lazy<Type> = Lazy::new(|| Type::atomic(NativeKind::Callable));

pub static LIST: Lazy<Type> = Lazy::new(|| container(NativeKind::List));
pub static TUPLE: Lazy<Type> = Lazy::new(|| container(NativeKind::Tuple));
pub static SET: Lazy<Type> = Lazy::new(|| container(NativeKind::Set));
pub static FROZENSET: Lazy<Type> = Lazy::new(|| container(NativeKind::FrozenSet));
pub static SEQUENCE: Lazy<Type> = Lazy::new(|| container(NativeKind::Sequence));
pub static ITERABLE: Lazy<Type> = Lazy::new(|| container(NativeKind::Iterable));
pub static DICT: Lazy<Type> = Lazy::new(|| mapping(NativeKind::Dict));
pub static MAPPING: Lazy<Type> = Lazy::new(|| mapping(NativeKind::Mapping));

/// Shared node for a native kind in its unparameterized form
pub fn for_native(kind: NativeKind) -> Type {
    match kind {
        NativeKind::None => NONE.clone(),
        NativeKind::Bool => BOOL.clone(),
        NativeKind::Int => INT.clone(),
        NativeKind::Float => FLOAT.clone(),
        NativeKind::Number => NUMBER.clone(),
        NativeKind::Str => STR.clone(),
        NativeKind::Bytes => BYTES.clone(),
        NativeKind::Callable => CALLABLE.clone(),
        NativeKind::List => LIST.clone(),
        NativeKind::Tuple => TUPLE.clone(),
        NativeKind::Set => SET.clone(),
        NativeKind::FrozenSet => FROZENSET.clone(),
        NativeKind::Sequence => SEQUENCE.clone(),
        NativeKind::Iterable => ITERABLE.clone(),
        NativeKind::Dict => DICT.clone(),
        NativeKind::Mapping => MAPPING.clone(),
    }
}
