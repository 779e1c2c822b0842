// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use tracing::{trace, warn};

use cm::{Bindings, Combination, Feasibility};
use common::{GenerationError, GenerationMode, UNDEFINED_VALUE};

use crate::WorkList;

use super::ModelGenerator;

impl ModelGenerator<'_> {
    /// Add rows until every open cell is covered.
    ///
    /// Every row starts from the next seed, if any. In [GenerationMode::Approximate] the rest of the row is random,
    /// otherwise parameters forced by the work list are bound first and the combination with the most open cells
    /// provides the values when the work list runs dry.
    pub(super) fn run(&mut self) -> Result<(), GenerationError> {
        while !self.open.is_covered() {
            if (self.context.abort)() {
                return Err(GenerationError::Cancelled);
            }

            self.bindings.reset();
            self.combinations.iter_mut().for_each(Combination::reset_bindings);
            let mut worklist = WorkList::new();

            if let Some(seed) = self.seeds.pop_front() {
                for &(slot, _) in &seed {
                    self.bindings.mark_pending(slot);
                }
                for (slot, value) in seed {
                    self.bind(slot, value, &mut worklist)?;
                }
            }

            if self.context.mode == GenerationMode::Approximate {
                if !self.bind_random_row(&mut worklist)? {
                    warn!(model = %self.model, open = self.open.count(), "No random row without exclusions was found, stopping");
                    break;
                }
            } else {
                while self.bindings.unbound_count() > 0 {
                    match worklist.pop() {
                        Some(slot) if !self.bindings.is_bound(slot) => {
                            let value = self.pick_value(slot)?;
                            self.bind(slot, value, &mut worklist)?;
                        }
                        Some(_) => {}
                        None => self.bind_most_open(&mut worklist)?,
                    }
                }
            }

            let row: Vec<usize> = self.bindings.row().into_iter().map(|value| value.unwrap_or(UNDEFINED_VALUE)).collect();
            trace!(model = %self.model, open = self.open.count(), "Row {:?}", row);
            self.rows.push(row);
        }
        Ok(())
    }

    /// Bind the value and update the combinations of the slot. Slots completing a combination are queued.
    fn bind(&mut self, slot: usize, value: usize, worklist: &mut WorkList) -> Result<(), GenerationError> {
        self.bindings.bind(slot, value)?;

        let Self { slots, combinations, bindings, open, .. } = self;
        for &id in &slots[slot].combinations {
            let combination = &mut combinations[id];
            if combination.add_binding(&*bindings, open) + 1 == combination.len() {
                for &member in combination.members() {
                    if !bindings.is_bound(member) {
                        worklist.add(member, bindings);
                    }
                }
            }
        }
        Ok(())
    }

    /// Bind every unbound member of the combination to the values of the given cell.
    fn bind_cell(&mut self, combination: usize, index: usize, worklist: &mut WorkList) -> Result<(), GenerationError> {
        for &member in self.combinations[combination].members() {
            self.bindings.mark_pending(member);
        }
        for (member, value) in self.combinations[combination].decode(index) {
            if !self.bindings.is_bound(member) {
                self.bind(member, value, worklist)?;
            }
        }
        Ok(())
    }

    /// Pick the combination that can still cover the most open cells and bind one of those cells.
    ///
    /// Without any reachable open cell, a covered cell agreeing with the row is picked proportional to its weight.
    fn bind_most_open(&mut self, worklist: &mut WorkList) -> Result<(), GenerationError> {
        let mut max_open = 0;
        let mut max_match = 0;
        let mut ties = 0;
        let mut choice = None;
        for (id, combination) in self.combinations.iter().enumerate() {
            if combination.is_fully_bound() {
                continue;
            }

            let mut open = 0;
            let mut matched = 0;
            for index in 0..combination.range() {
                match combination.feasible_at(index, &self.bindings) {
                    Feasibility::Open => open += 1,
                    Feasibility::CoveredMatch => matched += 1,
                    Feasibility::Excluded => {}
                }
            }

            if open > max_open {
                choice = Some(id);
                ties = 1;
                max_open = open;
            } else if open == max_open && max_open > 0 {
                ties += 1;
                if self.random.replace(ties) {
                    choice = Some(id);
                }
            } else if max_open == 0 && matched > max_match {
                choice = Some(id);
                ties = 1;
                max_match = matched;
            } else if max_open == 0 && matched > 0 && matched == max_match {
                ties += 1;
                if self.random.replace(ties) {
                    choice = Some(id);
                }
            }
        }

        let cell = match choice {
            Some(choice) if max_open == 0 => self.weighted_cell(choice).map(|index| (choice, index)),
            Some(choice) => {
                let combination = &self.combinations[choice];
                let candidates: Vec<usize> = (0..combination.range())
                    .filter(|&index| combination.feasible_at(index, &self.bindings) == Feasibility::Open)
                    .collect();
                Some((choice, candidates[self.random.below(candidates.len())]))
            }
            None => None,
        };

        match cell {
            Some((choice, index)) => self.bind_cell(choice, index, worklist),
            None if self.context.mode == GenerationMode::Preview => {
                let fallback = self.combinations.iter().position(|combination| !combination.is_fully_bound());
                match fallback {
                    Some(choice) => {
                        let index = self.combinations[choice].index_or_zero(&self.bindings);
                        self.bind_cell(choice, index, worklist)
                    }
                    None => Err(GenerationError::Failure("no combination can complete the row".to_string())),
                }
            }
            None => Err(GenerationError::Failure("no combination can complete the row".to_string())),
        }
    }

    /// A cell of the combination agreeing with the row, picked proportional to the summed weight of its values.
    fn weighted_cell(&mut self, choice: usize) -> Option<usize> {
        let combination = &self.combinations[choice];
        let mut total = 0;
        let mut best = None;
        for index in 0..combination.range() {
            if combination.feasible_at(index, &self.bindings) == Feasibility::Excluded {
                continue;
            }
            let weight = combination.weight(index, |member, value| self.slots[member].weight(value));
            if self.random.replace_weighted(&mut total, weight) {
                best = Some(index);
            }
        }
        best
    }

    /// Pick the value for the slot that completes the most combinations, then the one that keeps the most cells
    /// reachable. Values completing an excluded cell are never picked.
    fn pick_value(&mut self, slot: usize) -> Result<usize, GenerationError> {
        let Self { slots, combinations, bindings, random, scratch, context, .. } = self;
        let target = &slots[slot];

        let mut max_complete: isize = 0;
        let mut max_total: isize = 0;
        let mut best_value = 0;
        let mut best_count: u64 = 0;
        let mut legal = false;
        for value in 0..target.value_count {
            bindings.trial(slot, value);
            let mut total: isize = 0;
            let mut complete: isize = 0;
            for &id in &target.combinations {
                let combination = &combinations[id];
                let zeros = combination.feasible(&*bindings, scratch) as isize;
                total += zeros;
                if combination.bound_count() + 1 >= combination.len() {
                    if zeros > 0 {
                        complete += 1;
                    }
                    if combination.violates_exclusion(&*bindings) {
                        total = -1;
                        complete = -1;
                        break;
                    }
                }
            }
            bindings.release(slot);
            legal |= complete >= 0;

            if complete > max_complete {
                max_complete = complete;
                max_total = total;
                best_value = value;
                best_count = 1;
            } else if complete == max_complete {
                if total > max_total {
                    max_total = total;
                    best_value = value;
                    best_count = 1;
                } else if target.weights.is_some() && total == 0 && max_total == 0 {
                    let weight = target.weight(value);
                    if random.replace_weighted(&mut best_count, weight) || best_count == 0 {
                        best_value = value;
                    }
                } else if total == max_total {
                    best_count += 1;
                    if random.replace(best_count as usize) {
                        best_value = value;
                    }
                }
            }
        }

        if !legal && context.mode != GenerationMode::Preview {
            return Err(GenerationError::Failure(format!("every value of {} completes an excluded combination", target.id)));
        }
        Ok(best_value)
    }

    fn random_value(&mut self, slot: usize) -> usize {
        let slot = &self.slots[slot];
        match slot.weights {
            Some(weights) => self.random.weighted_index(weights).unwrap_or_else(|| self.random.below(slot.value_count)),
            None => self.random.below(slot.value_count),
        }
    }

    /// Complete the row with random values for the unbound slots, retrying while the row hits an exclusion.
    ///
    /// Returns false if no acceptable row was found within the allowed number of tries.
    fn bind_random_row(&mut self, worklist: &mut WorkList) -> Result<bool, GenerationError> {
        let tries = self.context.max_random_tries.max(1);
        let mut row = vec![0; self.slots.len()];
        for _ in 0..tries {
            for (slot, value) in row.iter_mut().enumerate() {
                *value = match self.bindings.value(slot) {
                    Some(bound) => bound,
                    None => self.random_value(slot),
                };
            }
            if self.violates(&row) {
                continue;
            }

            for slot in 0..row.len() {
                if !self.bindings.is_bound(slot) {
                    self.bindings.mark_pending(slot);
                }
            }
            for (slot, &value) in row.iter().enumerate() {
                if !self.bindings.is_bound(slot) {
                    self.bind(slot, value, worklist)?;
                }
            }
            return Ok(true);
        }
        Ok(false)
    }
}
