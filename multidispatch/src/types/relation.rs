//! Subtype relation engine.
//!
//! `a <= b` is decided by a fixed rule table matched on the variants of
//! both operands. Rules are tried in descending priority; the first rule
//! that is defined for the pair (returns `Some`) decides the result.
//!
//! | priority | rule              | pair                                  |
//! |---------:|-------------------|---------------------------------------|
//! |      100 | `top_absorbs`     | `_ <= Any`                            |
//! |       90 | `wildcard`        | `? <= _`, `_ <= ?`                    |
//! |       60 | `literal_left`    | `Literal <= _` (every value conforms) |
//! |       51 | `sum_left`        | `Sum <= _` (all alternatives)         |
//! |       50 | `sum_right`       | `_ <= Sum` (some alternative)         |
//! |        4 | `constraint_pair` | `Constraint <= Constraint` (equality) |
//! |        3 | `phantom_pair`    | same marker, compare items            |
//! |        2 | `phantom_right`   | `a <= P[x]` iff `a <= x`              |
//! |        2 | `phantom_left`    | `P[x] <= b` iff `x <= b`              |
//! |        1 | `constraint_base` | `C(base) <= b` iff `base <= b`        |
//! |        0 | kind-pair rules   | atomic, generic, product combinations |
//! |       -1 | `identity`        | structural equality                   |
//!
//! The engine is plain pattern matching; it never goes through dispatch.

use std::cmp::Reverse;
use std::fmt;

use multidispatch_runtime::NativeKind;
use once_cell::sync::Lazy;

use super::node::{Type, TypeNode, Variance};

type RuleFn = fn(&Type, &Type) -> Option<bool>;

/// One entry of the subtype rule table
#[derive(Clone, Copy)]
pub struct SubtypeRule {
    pub name: &'static str,
    pub priority: i32,
    check: RuleFn,
}

impl fmt::Debug for SubtypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubtypeRule")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish()
    }
}

fn rule(name: &'static str, priority: i32, check: RuleFn) -> SubtypeRule {
    SubtypeRule {
        name,
        priority,
        check,
    }
}

/// Rules sorted by descending priority; ties keep declaration order
static RULES: Lazy<Vec<SubtypeRule>> = Lazy::new(|| {
    let mut rules = vec![
        rule("top_absorbs", 100, top_absorbs),
        rule("wildcard", 90, wildcard),
        rule("literal_left", 60, literal_left),
        rule("sum_left", 51, sum_left),
        rule("sum_right", 50, sum_right),
        rule("constraint_pair", 4, constraint_pair),
        rule("phantom_pair", 3, phantom_pair),
        rule("phantom_right", 2, phantom_right),
        rule("phantom_left", 2, phantom_left),
        rule("constraint_base", 1, constraint_base),
        rule("atomic_pair", 0, atomic_pair),
        rule("generic_pair", 0, generic_pair),
        rule("generic_atomic", 0, generic_atomic),
        rule("atomic_generic", 0, atomic_generic),
        rule("product_pair", 0, product_pair),
        rule("product_generic", 0, product_generic),
        rule("product_atomic", 0, product_atomic),
        rule("identity", -1, identity),
    ];
    rules.sort_by_key(|r| Reverse(r.priority));
    rules
});

/// The rule table in evaluation order
pub fn rules() -> &'static [SubtypeRule] {
    &RULES
}

/// Name of the rule that decides `a <= b`
pub fn deciding_rule(a: &Type, b: &Type) -> Option<&'static str> {
    RULES
        .iter()
        .find(|rule| (rule.check)(a, b).is_some())
        .map(|rule| rule.name)
}

/// `a <= b`
pub fn is_subtype(a: &Type, b: &Type) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    for rule in RULES.iter() {
        if let Some(result) = (rule.check)(a, b) {
            return result;
        }
    }
    false
}

impl Type {
    /// `self <= other`
    ///
    /// # Examples
    /// ```
    /// use multidispatch::types::builtins::{ANY, BOOL, INT, STR};
    /// use multidispatch::types::Type;
    ///
    /// assert!(BOOL.is_subtype_of(&INT));
    /// assert!(INT.is_subtype_of(&ANY));
    /// assert!(INT.is_subtype_of(&Type::union([INT.clone(), STR.clone()])));
    /// assert!(!STR.is_subtype_of(&INT));
    /// ```
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        is_subtype(self, other)
    }

    /// `self >= other`
    pub fn is_supertype_of(&self, other: &Type) -> bool {
        is_subtype(other, self)
    }

    /// `self <= other` but not `other <= self`
    pub fn is_strict_subtype_of(&self, other: &Type) -> bool {
        is_subtype(self, other) && !is_subtype(other, self)
    }
}

// ==================== Rules ====================

fn top_absorbs(_a: &Type, b: &Type) -> Option<bool> {
    b.is_top().then_some(true)
}

fn wildcard(a: &Type, b: &Type) -> Option<bool> {
    (a.is_wildcard() || b.is_wildcard()).then_some(true)
}

fn literal_left(a: &Type, b: &Type) -> Option<bool> {
    match a.node() {
        TypeNode::Literal(values) => Some(values.iter().all(|v| b.test_instance(&v.to_value()))),
        _ => None,
    }
}

fn sum_left(a: &Type, b: &Type) -> Option<bool> {
    match a.node() {
        TypeNode::Sum(alts) => Some(alts.iter().all(|alt| is_subtype(alt, b))),
        _ => None,
    }
}

/// Wrapped type seen through a transparent or refining left operand
fn unwrap_left(a: &Type) -> Option<&Type> {
    match a.node() {
        TypeNode::Constraint { base, .. } => Some(base),
        TypeNode::Phantom { item, .. } => Some(item),
        _ => None,
    }
}

fn sum_right(a: &Type, b: &Type) -> Option<bool> {
    match b.node() {
        TypeNode::Sum(alts) => Some(
            alts.iter().any(|alt| is_subtype(a, alt))
                || unwrap_left(a).is_some_and(|inner| is_subtype(inner, b)),
        ),
        _ => None,
    }
}

fn constraint_pair(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (TypeNode::Constraint { .. }, TypeNode::Constraint { .. }) => Some(a == b),
        _ => None,
    }
}

fn phantom_pair(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (
            TypeNode::Phantom {
                marker: m1,
                item: i1,
            },
            TypeNode::Phantom {
                marker: m2,
                item: i2,
            },
        ) if m1 == m2 => Some(is_subtype(i1, i2)),
        _ => None,
    }
}

fn phantom_right(a: &Type, b: &Type) -> Option<bool> {
    match b.node() {
        TypeNode::Phantom { item, .. } => Some(is_subtype(a, item)),
        _ => None,
    }
}

fn phantom_left(a: &Type, b: &Type) -> Option<bool> {
    match a.node() {
        TypeNode::Phantom { item, .. } => Some(is_subtype(item, b)),
        _ => None,
    }
}

fn constraint_base(a: &Type, b: &Type) -> Option<bool> {
    match a.node() {
        TypeNode::Constraint { base, .. } => Some(is_subtype(base, b)),
        _ => None,
    }
}

fn atomic_pair(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (TypeNode::Atomic(k1), TypeNode::Atomic(k2)) => Some(k1.is_subkind_of(k2)),
        _ => None,
    }
}

fn items_compatible(sub: &Type, sup: &Type, variance: Variance) -> bool {
    match variance {
        Variance::Covariant => is_subtype(sub, sup),
        Variance::Contravariant => is_subtype(sup, sub),
        Variance::Invariant => sub == sup || sub.is_wildcard() || sup.is_wildcard(),
    }
}

/// The supertype side's variance tag governs the item comparison
fn generic_pair(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (
            TypeNode::Generic {
                base: b1, item: i1, ..
            },
            TypeNode::Generic {
                base: b2,
                item: i2,
                variance,
            },
        ) => Some(is_subtype(b1, b2) && items_compatible(i1, i2, *variance)),
        _ => None,
    }
}

fn generic_atomic(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (TypeNode::Generic { base, .. }, TypeNode::Atomic(_)) => Some(is_subtype(base, b)),
        _ => None,
    }
}

/// A bare kind is only as specific as a generic that constrains nothing
fn atomic_generic(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (TypeNode::Atomic(_), TypeNode::Generic { base, item, .. }) => {
            Some(item.is_unconstrained_item() && is_subtype(a, base))
        }
        _ => None,
    }
}

fn product_pair(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (TypeNode::Product(xs), TypeNode::Product(ys)) => Some(
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| is_subtype(x, y)),
        ),
        _ => None,
    }
}

fn tuple_kind_within(b: &Type) -> bool {
    is_subtype(&Type::atomic(NativeKind::Tuple), b)
}

fn product_generic(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (TypeNode::Product(items), TypeNode::Generic { base, item, .. }) => Some(
            tuple_kind_within(base) && items.iter().all(|x| is_subtype(x, item)),
        ),
        _ => None,
    }
}

fn product_atomic(a: &Type, b: &Type) -> Option<bool> {
    match (a.node(), b.node()) {
        (TypeNode::Product(_), TypeNode::Atomic(_)) => Some(tuple_kind_within(b)),
        _ => None,
    }
}

fn identity(a: &Type, b: &Type) -> Option<bool> {
    Some(a == b)
}
