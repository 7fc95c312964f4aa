//! Dynamic value type
//!
//! Host values that types are tested against and that dispatched
//! implementations receive and return.

use std::fmt;
use std::sync::Arc;

use crate::class::Instance;
use crate::error::RuntimeResult;
use crate::kind::{NativeKind, ValueKind};

/// Signature of a callable host value
pub type NativeFn = dyn Fn(&[Value]) -> RuntimeResult<Value> + Send + Sync;

/// A named callable value
#[derive(Clone)]
pub struct FunctionRef {
    pub name: Arc<str>,
    call: Arc<NativeFn>,
}

impl FunctionRef {
    pub fn new<F>(name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> RuntimeResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            call: Arc::new(f),
        }
    }

    pub fn call(&self, args: &[Value]) -> RuntimeResult<Value> {
        (self.call)(args)
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

/// Dynamic value
#[derive(Debug, Clone)]
pub enum Value {
    // ========== Scalars ==========
    /// The absent value
    None,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// String
    Str(String),
    /// Byte string
    Bytes(Vec<u8>),

    // ========== Containers ==========
    /// Ordered, growable sequence
    List(Vec<Value>),
    /// Fixed sequence
    Tuple(Vec<Value>),
    /// Unordered unique elements (insertion order kept for display)
    Set(Vec<Value>),
    /// Immutable set
    FrozenSet(Vec<Value>),
    /// Key/value pairs in insertion order
    Dict(Vec<(Value, Value)>),

    // ========== Objects ==========
    /// Callable
    Function(FunctionRef),
    /// Instance of a user class
    Object(Arc<Instance>),
}

impl Value {
    /// Get the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Object(instance) => ValueKind::Class(instance.class.clone()),
            _ => ValueKind::Native(self.native_kind().unwrap_or(NativeKind::None)),
        }
    }

    /// Native kind of this value, `None` for class instances
    pub fn native_kind(&self) -> Option<NativeKind> {
        Some(match self {
            Value::None => NativeKind::None,
            Value::Bool(_) => NativeKind::Bool,
            Value::Int(_) => NativeKind::Int,
            Value::Float(_) => NativeKind::Float,
            Value::Str(_) => NativeKind::Str,
            Value::Bytes(_) => NativeKind::Bytes,
            Value::List(_) => NativeKind::List,
            Value::Tuple(_) => NativeKind::Tuple,
            Value::Set(_) => NativeKind::Set,
            Value::FrozenSet(_) => NativeKind::FrozenSet,
            Value::Dict(_) => NativeKind::Dict,
            Value::Function(_) => NativeKind::Callable,
            Value::Object(_) => return None,
        })
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &str {
        match self {
            Value::Object(instance) => instance.class.name(),
            _ => self.native_kind().map_or("None", |k| k.name()),
        }
    }

    /// Check if this value is None
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view (bools count as integers)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Numeric view of ints, bools and floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => self.as_int().map(|n| n as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Elements of list, tuple and set values
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(items)
            | Value::Tuple(items)
            | Value::Set(items)
            | Value::FrozenSet(items) => Some(items),
            _ => None,
        }
    }

    /// Key/value pairs of dict values
    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Number of elements, entries, characters or bytes
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Bytes(b) => Some(b.len()),
            Value::Dict(entries) => Some(entries.len()),
            _ => self.elements().map(<[Value]>::len),
        }
    }

    // ========== Constructors ==========

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    /// Build a set, dropping repeated elements
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(dedup(items))
    }

    pub fn frozenset(items: impl IntoIterator<Item = Value>) -> Self {
        Value::FrozenSet(dedup(items))
    }

    pub fn dict(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Dict(entries.into_iter().collect())
    }

    pub fn function<F>(name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> RuntimeResult<Value> + Send + Sync + 'static,
    {
        Value::Function(FunctionRef::new(name, f))
    }
}

pub(crate) fn dedup(items: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) | (Value::FrozenSet(a), Value::FrozenSet(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.contains(x))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len() && a.iter().all(|entry| b.contains(entry))
            }
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

// ========== Conversions ==========

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Dict(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ========== Display ==========

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value], open: &str, close: &str) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Value::List(items) => write_seq(f, items, "[", "]"),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Value::Tuple(items) => write_seq(f, items, "(", ")"),
            Value::Set(items) if items.is_empty() => write!(f, "set()"),
            Value::Set(items) => write_seq(f, items, "{", "}"),
            Value::FrozenSet(items) => write_seq(f, items, "frozenset({", "})"),
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::Object(instance) => {
                write!(f, "{}(", instance.class.name())?;
                for (i, (k, v)) in instance.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, ")")
            }
        }
    }
}
