//! Conformance testing: does a runtime value belong to a type?
//!
//! Testing is a fast boolean walk. Validation re-walks a failing value
//! only to locate the first offending element, so successful checks never
//! allocate.

use std::fmt;

use multidispatch_runtime::{NativeKind, Value, ValueKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::node::{Type, TypeNode};

/// Chooses which elements of a container are checked
pub trait Sampler: fmt::Debug {
    /// Indices to check for a container of `len` elements, `None` for all
    fn sample(&self, len: usize) -> Option<Vec<usize>>;
}

/// Checks every element
#[derive(Debug, Clone, Copy, Default)]
pub struct FullSampler;

impl Sampler for FullSampler {
    fn sample(&self, _len: usize) -> Option<Vec<usize>> {
        None
    }
}

/// Checks at most `limit` elements, chosen by a seeded RNG
///
/// A zero limit checks every element.
///
/// The choice is a pure function of the seed and the container length,
/// so repeated checks of the same container agree.
#[derive(Debug, Clone, Copy)]
pub struct RandomSampler {
    pub limit: usize,
    pub seed: u64,
}

impl RandomSampler {
    pub fn new(limit: usize, seed: u64) -> Self {
        Self { limit, seed }
    }
}

impl Sampler for RandomSampler {
    fn sample(&self, len: usize) -> Option<Vec<usize>> {
        if self.limit == 0 || len <= self.limit {
            return None;
        }
        let mut rng = StdRng::seed_from_u64(self.seed ^ len as u64);
        let mut indices = rand::seq::index::sample(&mut rng, len, self.limit).into_vec();
        indices.sort_unstable();
        Some(indices)
    }
}

/// Step from a container to one of its elements
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Element at a position of a sequence or set
    Index(usize),
    /// A dict key itself
    Key(Value),
    /// The value stored under a dict key
    Entry(Value),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{}]", i),
            PathSegment::Key(k) => write!(f, ".key({})", k),
            PathSegment::Entry(k) => write!(f, "[{}]", k),
        }
    }
}

/// A value failed a conformance check
///
/// Carries the value and type that were checked plus the first failing
/// (sub-value, sub-type) pair and the path leading to it.
#[derive(Debug, Clone)]
pub struct ConformanceMismatch {
    pub value: Value,
    pub expected: Type,
    pub failed_value: Value,
    pub failed_type: Type,
    pub path: Vec<PathSegment>,
}

impl ConformanceMismatch {
    /// Path rendered as accessor text, e.g. `[2]["k"]`
    pub fn path_string(&self) -> String {
        self.path.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ConformanceMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected value of type {}, instead got {}",
            self.expected, self.value
        )?;
        if !self.path.is_empty() || self.failed_type != self.expected {
            write!(
                f,
                "\n\n    failed on item{}: {}, expected type {}",
                self.path_string(),
                self.failed_value,
                self.failed_type
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ConformanceMismatch {}

// ==================== Element access ====================

fn sampled(len: usize, sampler: &dyn Sampler) -> Vec<usize> {
    sampler.sample(len).unwrap_or_else(|| (0..len).collect())
}

/// Split a mapping item into key and (optional) value types
pub(crate) fn mapping_item<'a>(base: &Type, item: &'a Type) -> (&'a Type, Option<&'a Type>) {
    match item.node() {
        TypeNode::Product(kv) if kv.len() == 2 && is_mapping_base(base) => (&kv[0], Some(&kv[1])),
        _ => (item, None),
    }
}

/// Only mapping containers split a pair item into key and value types
fn is_mapping_base(base: &Type) -> bool {
    match base.node() {
        TypeNode::Atomic(kind) => kind.is_subkind_of(&ValueKind::from(NativeKind::Mapping)),
        _ => false,
    }
}

/// Elements of strings and bytes are produced on demand
fn scalar_elements(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Str(s) => Some(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        Value::Bytes(b) => Some(b.iter().map(|&x| Value::Int(x as i64)).collect()),
        _ => None,
    }
}

// ==================== Boolean walk ====================

pub(crate) fn accepts(ty: &Type, value: &Value, sampler: &dyn Sampler) -> bool {
    match ty.node() {
        TypeNode::Top | TypeNode::Wildcard => true,
        TypeNode::Atomic(kind) => value.kind().is_subkind_of(kind),
        TypeNode::Sum(alts) => alts.iter().any(|alt| accepts(alt, value, sampler)),
        TypeNode::Product(items) => match value {
            Value::Tuple(elems) if elems.len() == items.len() => items
                .iter()
                .zip(elems)
                .all(|(t, v)| accepts(t, v, sampler)),
            _ => false,
        },
        TypeNode::Generic { base, item, .. } => {
            accepts(base, value, sampler)
                && (item.is_unconstrained_item() || elements_accepted(base, item, value, sampler))
        }
        TypeNode::Phantom { item, .. } => accepts(item, value, sampler),
        TypeNode::Constraint { base, predicates } => {
            accepts(base, value, sampler) && predicates.iter().all(|p| p.test(value))
        }
        TypeNode::Literal(values) => values.iter().any(|lit| lit.matches(value)),
    }
}

fn elements_accepted(base: &Type, item: &Type, value: &Value, sampler: &dyn Sampler) -> bool {
    if let Some(elems) = value.elements() {
        return sampled(elems.len(), sampler)
            .into_iter()
            .all(|i| accepts(item, &elems[i], sampler));
    }
    if let Some(entries) = value.entries() {
        let (key_ty, val_ty) = mapping_item(base, item);
        return sampled(entries.len(), sampler).into_iter().all(|i| {
            let (k, v) = &entries[i];
            accepts(key_ty, k, sampler) && val_ty.map_or(true, |t| accepts(t, v, sampler))
        });
    }
    if let Some(elems) = scalar_elements(value) {
        return sampled(elems.len(), sampler)
            .into_iter()
            .all(|i| accepts(item, &elems[i], sampler));
    }
    false
}

// ==================== Failure location ====================

/// Find the first failing pair below a value already known to fail
fn locate(
    ty: &Type,
    value: &Value,
    sampler: &dyn Sampler,
    path: &mut Vec<PathSegment>,
) -> (Value, Type) {
    let here = || (value.clone(), ty.clone());
    match ty.node() {
        TypeNode::Product(items) => match value {
            Value::Tuple(elems) if elems.len() == items.len() => {
                for (i, (t, v)) in items.iter().zip(elems).enumerate() {
                    if !accepts(t, v, sampler) {
                        path.push(PathSegment::Index(i));
                        return locate(t, v, sampler, path);
                    }
                }
                here()
            }
            _ => here(),
        },
        TypeNode::Generic { base, item, .. } if accepts(base, value, sampler) => {
            locate_element(base, item, value, sampler, path).unwrap_or_else(here)
        }
        TypeNode::Phantom { item, .. } => locate(item, value, sampler, path),
        _ => here(),
    }
}

fn locate_element(
    base: &Type,
    item: &Type,
    value: &Value,
    sampler: &dyn Sampler,
    path: &mut Vec<PathSegment>,
) -> Option<(Value, Type)> {
    if let Some(entries) = value.entries() {
        let (key_ty, val_ty) = mapping_item(base, item);
        for i in sampled(entries.len(), sampler) {
            let (k, v) = &entries[i];
            if !accepts(key_ty, k, sampler) {
                path.push(PathSegment::Key(k.clone()));
                return Some(locate(key_ty, k, sampler, path));
            }
            if let Some(val_ty) = val_ty {
                if !accepts(val_ty, v, sampler) {
                    path.push(PathSegment::Entry(k.clone()));
                    return Some(locate(val_ty, v, sampler, path));
                }
            }
        }
        return None;
    }

    let owned;
    let elems: &[Value] = match value.elements() {
        Some(elems) => elems,
        None => {
            owned = scalar_elements(value)?;
            &owned
        }
    };
    for i in sampled(elems.len(), sampler) {
        if !accepts(item, &elems[i], sampler) {
            path.push(PathSegment::Index(i));
            return Some(locate(item, &elems[i], sampler, path));
        }
    }
    None
}

impl Type {
    /// Does `value` belong to this type?
    pub fn test_instance(&self, value: &Value) -> bool {
        accepts(self, value, &FullSampler)
    }

    /// Like [`Type::test_instance`], checking only sampled container elements
    pub fn test_instance_sampled(&self, value: &Value, sampler: &dyn Sampler) -> bool {
        accepts(self, value, sampler)
    }

    /// Check membership, reporting the first failing element on mismatch
    pub fn validate_instance(&self, value: &Value) -> Result<(), ConformanceMismatch> {
        self.validate_instance_sampled(value, &FullSampler)
    }

    pub fn validate_instance_sampled(
        &self,
        value: &Value,
        sampler: &dyn Sampler,
    ) -> Result<(), ConformanceMismatch> {
        if accepts(self, value, sampler) {
            return Ok(());
        }
        let mut path = Vec::new();
        let (failed_value, failed_type) = locate(self, value, sampler, &mut path);
        Err(ConformanceMismatch {
            value: value.clone(),
            expected: self.clone(),
            failed_value,
            failed_type,
            path,
        })
    }
}
