// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use common::{ParameterId, Term};

/// The collection of exclusions of a model.
///
/// Ordered on size first, so more general exclusions come first.
pub type ExclusionSet = BTreeSet<Exclusion>;

/// A set of values that must never appear together in a row.
///
/// The terms are kept sorted. Two exclusions are equal if their terms are, the `deleted` flag is only used
/// while deriving and does not take part in comparisons.
#[derive(Clone, Debug, Default)]
pub struct Exclusion {
    terms: Vec<Term>,
    deleted: bool,
}

impl Exclusion {
    /// Create a new exclusion from the given terms. Duplicate terms are merged.
    pub fn new<I: IntoIterator<Item=Term>>(terms: I) -> Self {
        let mut terms: Vec<Term> = terms.into_iter().collect();
        terms.sort();
        terms.dedup();
        Self { terms, deleted: false }
    }

    /// Add a term, returns false if it was already present.
    pub fn insert(&mut self, term: Term) -> bool {
        match self.terms.binary_search(&term) {
            Ok(_) => false,
            Err(at) => {
                self.terms.insert(at, term);
                true
            }
        }
    }

    /// The sorted terms.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms. An empty exclusion excludes everything.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value the given parameter is excluded at, if this exclusion mentions it.
    pub fn value_of(&self, parameter: ParameterId) -> Option<usize> {
        self.terms.iter().find(|t| t.parameter == parameter).map(|t| t.value)
    }

    /// Whether the given parameter is part of this exclusion.
    pub fn contains_parameter(&self, parameter: ParameterId) -> bool {
        self.terms.iter().any(|t| t.parameter == parameter)
    }

    /// The distinct parameters of this exclusion.
    pub fn parameters(&self) -> impl Iterator<Item=ParameterId> + '_ {
        let mut previous = None;
        self.terms.iter().filter_map(move |t| {
            if previous == Some(t.parameter) {
                None
            } else {
                previous = Some(t.parameter);
                Some(t.parameter)
            }
        })
    }

    /// Whether every term of `self` is also a term of `other`.
    pub fn is_subset_of(&self, other: &Exclusion) -> bool {
        self.len() <= other.len() && self.terms.iter().all(|t| other.terms.binary_search(t).is_ok())
    }

    /// Whether the two exclusions agree on every shared parameter, except `ignored`.
    pub fn is_consistent_with(&self, other: &Exclusion, ignored: ParameterId) -> bool {
        let (mut left, mut right) = (self.terms.iter().peekable(), other.terms.iter().peekable());
        while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
            match a.parameter.cmp(&b.parameter) {
                Ordering::Less => { left.next(); }
                Ordering::Greater => { right.next(); }
                Ordering::Equal => {
                    if a.parameter != ignored && a.value != b.value {
                        return false;
                    }
                    left.next();
                    right.next();
                }
            }
        }
        true
    }

    /// Whether all terms hold for the given values.
    pub fn matches<F: Fn(ParameterId) -> Option<usize>>(&self, value_of: F) -> bool {
        self.terms.iter().all(|t| value_of(t.parameter) == Some(t.value))
    }

    /// Mark this exclusion as superseded.
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// Whether this exclusion has been superseded.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl PartialEq for Exclusion {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Eq for Exclusion {}

impl Hash for Exclusion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.terms.hash(state);
    }
}

impl PartialOrd for Exclusion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Exclusion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len().cmp(&other.len()).then_with(|| self.terms.cmp(&other.terms))
    }
}

impl FromIterator<Term> for Exclusion {
    fn from_iter<T: IntoIterator<Item=Term>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl Display for Exclusion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (at, term) in self.terms.iter().enumerate() {
            if at > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", term)?;
        }
        f.write_str("}")
    }
}
