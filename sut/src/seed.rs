// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::collections::BTreeSet;

use common::{ParameterId, Term};

use crate::Exclusion;

/// A partial row that has to appear in the result, unless it contains an exclusion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RowSeed {
    terms: BTreeSet<Term>,
}

impl RowSeed {
    /// Create a new seed from the given terms.
    pub fn new<I: IntoIterator<Item=Term>>(terms: I) -> Self {
        Self { terms: terms.into_iter().collect() }
    }

    /// Add a term.
    pub fn insert(&mut self, term: Term) -> bool {
        self.terms.insert(term)
    }

    /// The terms, sorted on parameter.
    pub fn terms(&self) -> impl Iterator<Item=&Term> {
        self.terms.iter()
    }

    /// The number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the seed does not fix any parameter.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value this seed fixes for the given parameter.
    pub fn value_of(&self, parameter: ParameterId) -> Option<usize> {
        self.terms.iter().find(|t| t.parameter == parameter).map(|t| t.value)
    }

    /// Whether every term of `other` is part of this seed.
    pub fn contains(&self, other: &RowSeed) -> bool {
        other.terms.is_subset(&self.terms)
    }

    /// Whether this seed contains every term of the exclusion.
    pub fn violates(&self, exclusion: &Exclusion) -> bool {
        exclusion.terms().iter().all(|t| self.terms.contains(t))
    }

    /// Keep only the terms for which `keep` returns true.
    pub fn retain<F: FnMut(&Term) -> bool>(&mut self, keep: F) {
        self.terms.retain(keep);
    }
}

impl FromIterator<Term> for RowSeed {
    fn from_iter<T: IntoIterator<Item=Term>>(iter: T) -> Self {
        Self::new(iter)
    }
}
