// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! Checks for generated rows.
//!
//! These checks are brute force and meant for tests and the `check-mca` binary, not for generation.

use std::collections::HashSet;

use common::{Id, Term, UNDEFINED_VALUE};
use pc_list::PCList;

use crate::MCA;

fn row_contains(mca: &MCA, lookup: &[Option<usize>], row: usize, terms: &[Term]) -> bool {
    terms.iter().all(|term| {
        match lookup.get(term.parameter.as_usize()).copied().flatten() {
            Some(column) => mca.rows[row][column] == term.value,
            None => false,
        }
    })
}

/// Step to the next value tuple, the last position fastest. Returns false after the last tuple.
fn advance(values: &mut [usize], radices: &[usize]) -> bool {
    for at in (0..values.len()).rev() {
        values[at] += 1;
        if values[at] < radices[at] {
            return true;
        }
        values[at] = 0;
    }
    false
}

/// Return every `(row, exclusion)` pair where the row contains all terms of the exclusion.
pub fn exclusion_violations<'a, I>(mca: &MCA, exclusions: I) -> Vec<(usize, Vec<Term>)>
    where
        I: IntoIterator<Item=&'a [Term]>,
{
    let lookup = mca.column_lookup();
    let exclusions: Vec<&[Term]> = exclusions.into_iter().filter(|terms| !terms.is_empty()).collect();
    let mut result = Vec::new();
    for row in 0..mca.len() {
        for terms in exclusions.iter() {
            if row_contains(mca, &lookup, row, terms) {
                result.push((row, terms.to_vec()));
            }
        }
    }
    result
}

/// Return every interaction of `order` of the given `(column, value count)` pairs that no row contains.
///
/// Interactions containing all terms of one of the exclusions are not required and therefore never returned.
pub fn uncovered_interactions(mca: &MCA, columns: &[(usize, usize)], order: usize, exclusions: &[&[Term]]) -> Vec<Vec<Term>> {
    let order = order.min(columns.len());
    let mut result = Vec::new();
    if order == 0 {
        return result;
    }

    for pc in PCList::uniform(columns.len(), order).pcs {
        let selected: Vec<(usize, usize)> = pc.iter().map(|&at| columns[at]).collect();
        let radices: Vec<usize> = selected.iter().map(|&(_, value_count)| value_count).collect();
        let seen: HashSet<Vec<usize>> = mca.rows.iter()
            .map(|row| selected.iter().map(|&(column, _)| row[column]).collect::<Vec<usize>>())
            .filter(|values| !values.contains(&UNDEFINED_VALUE))
            .collect();

        let mut values = vec![0; order];
        loop {
            let terms: Vec<Term> = selected.iter().zip(&values)
                .map(|(&(column, _), &value)| Term::new(mca.columns[column], value))
                .collect();
            let excluded = exclusions.iter()
                .any(|exclusion| !exclusion.is_empty() && exclusion.iter().all(|term| terms.contains(term)));
            if !excluded && !seen.contains(&values) {
                result.push(terms);
            }

            if !advance(&mut values, &radices) {
                break;
            }
        }
    }
    result
}
