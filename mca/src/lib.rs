// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides the [MCA] (Mixed-level Covering Array), the rows generated for a model.
//!
//! The [MCA] also carries the cursor used to fetch rows one by one, and the [verify] module checks
//! generated rows against exclusions and coverage requirements.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use common::{Id, ParameterId, UNDEFINED_VALUE};

pub mod verify;

#[cfg(test)]
mod test;

/// The rows generated for one model.
///
/// Every row holds one value index per column. Result parameters may hold [UNDEFINED_VALUE].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MCA {
    /// The parameter of each column, sorted on the input sequence of the parameters.
    pub columns: Vec<ParameterId>,

    /// The rows, each as long as [MCA::columns].
    pub rows: Vec<Vec<usize>>,

    /// The number of interactions that had to be covered.
    pub total_combinations: usize,

    /// The number of interactions that were left uncovered.
    pub remaining_combinations: usize,

    position: usize,
}

impl MCA {
    /// Create a new [MCA] from the given columns and rows.
    pub fn new(columns: Vec<ParameterId>, rows: Vec<Vec<usize>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows, ..Self::default() }
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were generated.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The column of the given parameter.
    pub fn column_of(&self, parameter: ParameterId) -> Option<usize> {
        self.columns.iter().position(|&p| p == parameter)
    }

    /// The value of the given parameter in the given row, [None] for unknown parameters and undefined values.
    pub fn value(&self, row: usize, parameter: ParameterId) -> Option<usize> {
        let value = self.rows[row][self.column_of(parameter)?];
        if value == UNDEFINED_VALUE { None } else { Some(value) }
    }

    /// The ratio of covered interactions, one if there was nothing to cover.
    pub fn coverage(&self) -> f64 {
        if self.total_combinations == 0 {
            1.0
        } else {
            (self.total_combinations - self.remaining_combinations) as f64 / self.total_combinations as f64
        }
    }

    /// Rewind the cursor to the first row.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Return the row under the cursor and advance.
    ///
    /// Keeps returning [None] once all rows were returned, until [MCA::reset] is called.
    pub fn next_row(&mut self) -> Option<&[usize]> {
        let row = self.rows.get(self.position)?;
        self.position += 1;
        Some(row.as_slice())
    }

    /// Copy the row under the cursor into `buffer` and advance.
    ///
    /// Returns the number of rows that were left including the copied one, so zero means the rows are exhausted
    /// and the buffer was left untouched.
    pub fn copy_next_row(&mut self, buffer: &mut [usize]) -> usize {
        let remaining = self.len() - self.position.min(self.len());
        if let Some(row) = self.next_row() {
            buffer[..row.len()].copy_from_slice(row);
        }
        remaining
    }

    /// The column indices sorted on parameter, used to translate parameter ids into columns quickly.
    pub fn column_lookup(&self) -> Vec<Option<usize>> {
        let size = self.columns.iter().map(|p| p.as_usize() + 1).max().unwrap_or(0);
        let mut lookup = vec![None; size];
        for (column, parameter) in self.columns.iter().enumerate() {
            lookup[parameter.as_usize()] = Some(column);
        }
        lookup
    }
}
