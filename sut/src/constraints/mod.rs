// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::collections::BTreeSet;

use common::{Id, ParameterId, Term};

use crate::{Exclusion, SUT};

pub(crate) mod deriver;
pub(crate) mod trie;


/// Exclusions keeping every row to at most one negative value.
///
/// One exclusion is made for every pair of negative values of two different parameters.
pub fn negative_exclusions(sut: &SUT) -> Vec<Exclusion> {
    let negative: Vec<Term> = sut.parameters().iter().enumerate()
        .flat_map(|(id, parameter)| {
            parameter.negative_values().map(move |value| Term::new(ParameterId::from_usize(id), value))
        })
        .collect();

    let mut result = Vec::new();
    for (at, first) in negative.iter().enumerate() {
        for second in &negative[at + 1..] {
            if first.parameter != second.parameter {
                result.push(Exclusion::new([*first, *second]));
            }
        }
    }
    result
}

/// The first parameter for which single term exclusions rule out every value.
///
/// No row can be generated for such a parameter.
pub fn fully_excluded_parameter<'a, I>(sut: &SUT, exclusions: I) -> Option<ParameterId>
    where
        I: IntoIterator<Item=&'a Exclusion>,
{
    let mut excluded: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); sut.parameters().len()];
    for exclusion in exclusions {
        if let [term] = exclusion.terms() {
            if let Some(values) = excluded.get_mut(term.parameter.as_usize()) {
                values.insert(term.value);
            }
        }
    }
    excluded.iter().enumerate()
        .find(|(id, values)| !values.is_empty() && values.len() >= sut.parameters()[*id].value_count())
        .map(|(id, _)| ParameterId::from_usize(id))
}

/// The parameters with exactly one value, these do not add anything to the coverage.
pub fn single_value_parameters(sut: &SUT) -> Vec<ParameterId> {
    sut.parameters().iter().enumerate()
        .filter(|(_, parameter)| parameter.value_count() == 1)
        .map(|(id, _)| ParameterId::from_usize(id))
        .collect()
}
