//! Specificity resolution among several matching signatures.
//!
//! Each parameter column whose types are not all equal votes for the
//! candidates whose type there is not strictly less specific than another
//! candidate's. A candidate that wins every discriminating column is the
//! most specific one. Otherwise the explicit priorities of the surviving
//! pool decide, and only a unique strict maximum wins.

use super::signature::Signature;

/// Outcome of resolving a candidate set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One candidate is most specific in every discriminating column
    Unique(usize),
    /// Specificity tied; the candidate with the strictly highest priority won
    ByPriority(usize),
    /// Tied pool, ordered by descending priority
    Ambiguous(Vec<usize>),
}

/// Indices (into `column`) of the types no other type strictly refines
fn column_winners(column: &[&crate::types::Type]) -> Vec<bool> {
    column
        .iter()
        .map(|t| !column.iter().any(|u| u.is_strict_subtype_of(t)))
        .collect()
}

/// Pick the most specific of several same-arity candidates
///
/// # Examples
/// ```
/// use multidispatch::dispatch::{most_specific, Resolution, Signature};
/// use multidispatch::types::builtins::{ANY, INT};
///
/// let specific = Signature::new([INT.clone()]);
/// let general = Signature::new([ANY.clone()]);
/// let picked = most_specific(&[(&general, 0), (&specific, 0)]);
/// assert_eq!(picked, Resolution::Unique(1));
/// ```
pub fn most_specific(candidates: &[(&Signature, i32)]) -> Resolution {
    let n = candidates.len();
    if n == 1 {
        return Resolution::Unique(0);
    }
    let arity = candidates
        .iter()
        .map(|(sig, _)| sig.arity())
        .min()
        .unwrap_or(0);

    let mut intersection = vec![true; n];
    let mut union = vec![false; n];
    let mut discriminating = false;

    for col in 0..arity {
        let column: Vec<_> = candidates.iter().map(|(sig, _)| &sig.types()[col]).collect();
        if column.iter().all(|t| *t == column[0]) {
            continue;
        }
        discriminating = true;
        let winners = column_winners(&column);
        for i in 0..n {
            intersection[i] &= winners[i];
            union[i] |= winners[i];
        }
    }

    let survivors: Vec<usize> = (0..n).filter(|&i| intersection[i]).collect();
    if let [only] = survivors.as_slice() {
        return Resolution::Unique(*only);
    }

    let mut pool = if survivors.len() >= 2 || !discriminating {
        survivors
    } else {
        (0..n).filter(|&i| union[i]).collect()
    };
    if pool.is_empty() {
        pool = (0..n).collect();
    }

    // Stable: equal priorities keep registration order
    pool.sort_by_key(|&i| std::cmp::Reverse(candidates[i].1));
    match pool.as_slice() {
        [first, second, ..] if candidates[*first].1 > candidates[*second].1 => {
            Resolution::ByPriority(*first)
        }
        _ => Resolution::Ambiguous(pool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::builtins::{ANY, BOOL, INT, NUMBER, STR};
    use crate::types::Type;

    fn sig(types: &[&Type]) -> Signature {
        Signature::new(types.iter().map(|t| (*t).clone()))
    }

    #[test]
    fn test_more_specific_column_wins() {
        let a = sig(&[&INT]);
        let b = sig(&[&ANY]);
        assert_eq!(most_specific(&[(&a, 0), (&b, 0)]), Resolution::Unique(0));
        assert_eq!(most_specific(&[(&b, 0), (&a, 0)]), Resolution::Unique(1));
    }

    #[test]
    fn test_chain_of_three() {
        let a = sig(&[&NUMBER]);
        let b = sig(&[&BOOL]);
        let c = sig(&[&INT]);
        assert_eq!(
            most_specific(&[(&a, 0), (&b, 0), (&c, 0)]),
            Resolution::Unique(1)
        );
    }

    #[test]
    fn test_equal_columns_are_skipped() {
        let a = sig(&[&STR, &INT]);
        let b = sig(&[&STR, &ANY]);
        assert_eq!(most_specific(&[(&a, 0), (&b, 0)]), Resolution::Unique(0));
    }

    #[test]
    fn test_crossed_columns_are_ambiguous() {
        let a = sig(&[&INT, &ANY]);
        let b = sig(&[&ANY, &INT]);
        assert_eq!(
            most_specific(&[(&a, 0), (&b, 0)]),
            Resolution::Ambiguous(vec![0, 1])
        );
    }

    #[test]
    fn test_priority_breaks_tie() {
        let a = sig(&[&INT, &ANY]);
        let b = sig(&[&ANY, &INT]);
        assert_eq!(
            most_specific(&[(&a, 0), (&b, 1)]),
            Resolution::ByPriority(1)
        );
    }

    #[test]
    fn test_priority_tie_at_top_stays_ambiguous() {
        let a = sig(&[&INT, &ANY, &ANY]);
        let b = sig(&[&ANY, &INT, &ANY]);
        let c = sig(&[&ANY, &ANY, &INT]);
        assert_eq!(
            most_specific(&[(&a, 1), (&b, 2), (&c, 2)]),
            Resolution::Ambiguous(vec![1, 2, 0])
        );
    }

    #[test]
    fn test_priority_ignored_when_specificity_decides() {
        let a = sig(&[&INT]);
        let b = sig(&[&ANY]);
        assert_eq!(most_specific(&[(&a, 0), (&b, 10)]), Resolution::Unique(0));
    }

    #[test]
    fn test_dominated_candidate_leaves_pool() {
        // c loses both columns and cannot win on priority
        let a = sig(&[&INT, &ANY]);
        let b = sig(&[&ANY, &INT]);
        let c = sig(&[&ANY, &ANY]);
        assert_eq!(
            most_specific(&[(&a, 0), (&b, 0), (&c, 5)]),
            Resolution::Ambiguous(vec![0, 1])
        );
    }
}
