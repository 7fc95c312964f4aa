//! Canonical type poset.
//!
//! Types are immutable nodes compared structurally and ordered by a
//! rule-table subtype relation. Values are checked against them by the
//! conformance tester, which dispatch uses to walk its trie.
//!
//! # Module Organization
//!
//! - `node.rs`: `Type`, `TypeNode`, `Variance`, `LiteralValue`, constructors
//! - `builtins.rs`: shared nodes for builtin kinds
//! - `predicate.rs`: `Predicate` and the constraint factories
//! - `relation.rs`: the subtype rule table
//! - `conformance.rs`: membership tests, samplers, `ConformanceMismatch`
//! - `cast.rs`: type-directed coercion
//! - `registry.rs`: annotation canonicalization and user names
//! - `display.rs`: canonical annotation text
//! - `error.rs`: `TypeError`

pub mod builtins;
mod cast;
mod conformance;
mod display;
mod error;
mod node;
mod predicate;
pub mod relation;
mod registry;

#[cfg(test)]
mod tests;

pub use conformance::{ConformanceMismatch, FullSampler, PathSegment, RandomSampler, Sampler};
pub(crate) use conformance::accepts;
pub use error::{TypeError, TypeResult};
pub use node::{LiteralValue, Type, TypeNode, Variance};
pub use predicate::{Predicate, PredicateFn};
pub use registry::TypeRegistry;
pub use relation::{is_subtype, SubtypeRule};
