//! Predicates for constraint types and the built-in constraint factories.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use multidispatch_runtime::Value;
use regex::Regex;

use super::builtins;
use super::error::TypeError;
use super::node::Type;

/// Predicate function signature
pub type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A labelled value predicate
///
/// Predicates compare by identity: two predicates built from separate
/// closures are different even if they behave alike, so constraints built
/// by separate factory calls are distinct types.
#[derive(Clone)]
pub struct Predicate {
    label: Arc<str>,
    check: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(label: &str, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label),
            check: Arc::new(check),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.check)(value)
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.check) as *const () as usize
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.label)
    }
}

impl Type {
    /// `Int` restricted to an inclusive range
    ///
    /// # Examples
    /// ```
    /// use multidispatch::types::Type;
    /// use multidispatch_runtime::Value;
    ///
    /// let small = Type::int_range(Some(0), Some(9));
    /// assert!(small.test_instance(&Value::Int(3)));
    /// assert!(!small.test_instance(&Value::Int(10)));
    /// assert_eq!(small.to_string(), "Int(min=0, max=9)");
    /// ```
    pub fn int_range(min: Option<i64>, max: Option<i64>) -> Type {
        let mut predicates = Vec::new();
        if let Some(min) = min {
            predicates.push(Predicate::new(&format!("min={}", min), move |v| {
                v.as_int().is_some_and(|n| n >= min)
            }));
        }
        if let Some(max) = max {
            predicates.push(Predicate::new(&format!("max={}", max), move |v| {
                v.as_int().is_some_and(|n| n <= max)
            }));
        }
        Type::constrained(builtins::INT.clone(), predicates)
    }

    /// `Number` restricted to an inclusive range
    pub fn number_range(min: Option<f64>, max: Option<f64>) -> Type {
        let mut predicates = Vec::new();
        if let Some(min) = min {
            predicates.push(Predicate::new(&format!("min={}", min), move |v| {
                v.as_float().is_some_and(|x| x >= min)
            }));
        }
        if let Some(max) = max {
            predicates.push(Predicate::new(&format!("max={}", max), move |v| {
                v.as_float().is_some_and(|x| x <= max)
            }));
        }
        Type::constrained(builtins::NUMBER.clone(), predicates)
    }

    /// `Str` with a character count in an inclusive range
    pub fn str_length(min: Option<usize>, max: Option<usize>) -> Type {
        let mut predicates = Vec::new();
        if let Some(min) = min {
            predicates.push(Predicate::new(
                &format!("min_length={}", min),
                move |v| v.as_str().is_some_and(|s| s.chars().count() >= min),
            ));
        }
        if let Some(max) = max {
            predicates.push(Predicate::new(
                &format!("max_length={}", max),
                move |v| v.as_str().is_some_and(|s| s.chars().count() <= max),
            ));
        }
        Type::constrained(builtins::STR.clone(), predicates)
    }

    /// `Str` whose whole contents match a regular expression
    pub fn str_matching(pattern: &str) -> Result<Type, TypeError> {
        let anchored = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| TypeError::InvalidPattern(e.to_string()))?;
        let predicate = Predicate::new(&format!("pattern={:?}", pattern), move |v| {
            v.as_str().is_some_and(|s| anchored.is_match(s))
        });
        Ok(Type::constrained(builtins::STR.clone(), [predicate]))
    }
}
