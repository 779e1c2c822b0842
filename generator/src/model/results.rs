// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::collections::BTreeSet;

use tracing::{debug, info};

use common::{GenerationMode, GenerationType, Id, ParameterId, UNDEFINED_VALUE};
use mca::MCA;

use super::ModelGenerator;

/// Where the values of an output column come from.
#[derive(Copy, Clone, Debug)]
enum Source {
    Slot(usize),
    Submodel { slot: usize, column: usize },
}

impl ModelGenerator<'_> {
    /// Turn the generated rows into the results of the model.
    ///
    /// Pseudo-parameters are replaced by the columns of their sub-model and the columns are sorted on the input
    /// sequence of the parameters.
    pub(super) fn into_results(mut self) -> MCA {
        let mut rows = std::mem::take(&mut self.rows);
        if self.context.mode == GenerationMode::Preview {
            let before = rows.len();
            rows.retain(|row| !self.violates(row));
            if rows.len() < before {
                debug!(model = %self.model, dropped = before - rows.len(), "Removed rows that violate an exclusion");
            }
        }

        let mut sources: Vec<(ParameterId, Source)> = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.submodel.is_none() {
                sources.push((slot.id, Source::Slot(index)));
            }
        }
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(submodel) = slot.submodel {
                for (column, &parameter) in submodel.columns.iter().enumerate() {
                    if !sources.iter().any(|&(known, _)| known == parameter) {
                        sources.push((parameter, Source::Submodel { slot: index, column }));
                    }
                }
            }
        }
        sources.sort_by_key(|&(parameter, _)| self.sut.parameter(parameter).sequence());

        let rows: Vec<Vec<usize>> = rows.iter()
            .map(|row| {
                sources.iter()
                    .map(|&(_, source)| match source {
                        Source::Slot(slot) => row[slot],
                        Source::Submodel { slot, column } => self.slots[slot].submodel
                            .map_or(UNDEFINED_VALUE, |submodel| submodel.rows[row[slot]][column]),
                    })
                    .collect()
            })
            .collect();

        let columns = sources.into_iter().map(|(parameter, _)| parameter).collect();
        let mut results = MCA::new(columns, rows);
        if self.model == self.context.root {
            self.mark_undefined_results(&mut results);
        }

        let spec = self.sut.model(self.model);
        if let (GenerationType::Flat | GenerationType::Random, Some(max_rows)) = (spec.generation(), spec.max_rows()) {
            results.rows.truncate(max_rows);
        }

        results.total_combinations = self.total_combinations;
        results.remaining_combinations = self.open.count();
        info!(
            model = %self.model,
            rows = results.len(),
            combinations = results.total_combinations,
            remaining = results.remaining_combinations,
            "Rows generated"
        );
        results
    }

    /// Replace the value of every expected result by [UNDEFINED_VALUE] unless the exclusions leave exactly one value.
    ///
    /// Only exclusions of the model tree with at most one expected result are taken into account.
    fn mark_undefined_results(&self, results: &mut MCA) {
        let expected: Vec<(usize, ParameterId)> = results.columns.iter()
            .enumerate()
            .filter(|&(_, &parameter)| self.sut.parameter(parameter).is_expected_result())
            .map(|(column, &parameter)| (column, parameter))
            .collect();
        if expected.is_empty() {
            return;
        }

        let lookup = results.column_lookup();
        let column_of = |parameter: ParameterId| lookup.get(parameter.as_usize()).copied().flatten();
        let models = self.sut.subtree(self.model);
        let exclusions: Vec<_> = models.iter()
            .flat_map(|&model| self.sut.model(model).exclusions().iter())
            .filter(|exclusion| exclusion.parameters().all(|parameter| column_of(parameter).is_some()))
            .filter(|exclusion| {
                exclusion.parameters().filter(|&parameter| self.sut.parameter(parameter).is_expected_result()).count() <= 1
            })
            .collect();

        for row in &mut results.rows {
            for &(column, parameter) in &expected {
                let mut excluded = BTreeSet::new();
                for exclusion in &exclusions {
                    let matches = exclusion.terms().iter()
                        .filter(|term| !self.sut.parameter(term.parameter).is_expected_result())
                        .all(|term| column_of(term.parameter).map_or(false, |at| row[at] == term.value));
                    if matches {
                        if let Some(value) = exclusion.value_of(parameter) {
                            excluded.insert(value);
                        }
                    }
                }
                if excluded.len() + 1 != self.sut.parameter(parameter).value_count() {
                    row[column] = UNDEFINED_VALUE;
                }
            }
        }
    }
}
