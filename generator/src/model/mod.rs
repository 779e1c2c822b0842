// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This module generates the rows of a single model.
//!
//! The sub-models have to be generated first: the rows of every sub-model become the values of one pseudo-parameter.
//! Exclusions and seeds that mention parameters of a sub-model are rewritten to the rows of that sub-model that
//! agree with them, after which the pseudo-parameters are treated like any other parameter. Once the rows are
//! built the pseudo-parameters are expanded back into the columns of their sub-model.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use cm::{Cell, Combination, OpenCells};
use common::{sub_time_it, GenerationError, GenerationMode, GenerationType, Id, ModelId, ParameterId, Random, Term};
use common::MAX_ROWS_TO_GENERATE;
use mca::MCA;
use pc_list::PCList;
use sut::{Exclusion, ExclusionDeriver, ExclusionSet, RowSeed, SUT};

use crate::BindingTable;

mod results;
mod run;


/// The settings shared by every model of one generation run.
pub struct Context<'a> {
    /// How strictly rows are built.
    pub mode: GenerationMode,
    /// The number of random rows tried for every row in [GenerationMode::Approximate].
    pub max_random_tries: usize,
    /// Polled while generating; generation stops with [GenerationError::Cancelled] once it returns true.
    pub abort: &'a dyn Fn() -> bool,
    /// The model whose rows are the final result.
    pub root: ModelId,
}

/// A parameter of the model being generated, or a pseudo-parameter standing in for a sub-model.
struct Slot<'a> {
    id: ParameterId,
    value_count: usize,
    order: usize,
    weights: Option<&'a [u32]>,
    submodel: Option<&'a MCA>,
    combinations: Vec<usize>,
}

impl Slot<'_> {
    fn weight(&self, value: usize) -> u32 {
        self.weights.map_or(1, |weights| weights[value])
    }
}

struct ModelGenerator<'a> {
    sut: &'a SUT,
    model: ModelId,
    context: &'a Context<'a>,
    slots: Vec<Slot<'a>>,
    lookup: HashMap<ParameterId, usize>,
    exclusions: ExclusionSet,
    local_exclusions: Vec<Vec<(usize, usize)>>,
    seeds: VecDeque<Vec<(usize, usize)>>,
    combinations: Vec<Combination>,
    open: OpenCells,
    total_combinations: usize,
    bindings: BindingTable,
    random: Random,
    scratch: Vec<usize>,
    rows: Vec<Vec<usize>>,
}

/// Generate the rows of the given model and store them in it.
///
/// The sub-models of the model must have been generated before.
pub fn generate_model(sut: &mut SUT, model: ModelId, context: &Context) -> Result<(), GenerationError> {
    let results = ModelGenerator::new(sut, model, context).generate()?;
    debug!(%model, rows = results.len(), remaining = results.remaining_combinations, "Model generated");
    sut.model_mut(model).set_results(results);
    Ok(())
}

/// Lower every order that can not be reached: an order `k` needs at least `k` parameters of order `k` or higher.
///
/// Each order drops to the highest order that is reachable, so every parameter is part of some combination.
fn reachable_orders(mut orders: Vec<usize>) -> Vec<usize> {
    loop {
        let next: Vec<usize> = orders.iter()
            .map(|&order| {
                (1..=order).rev()
                    .find(|&k| orders.iter().filter(|&&other| other >= k).count() >= k)
                    .unwrap_or(1)
            })
            .collect();
        if next == orders {
            return orders;
        }
        orders = next;
    }
}

/// The rows of a sub-model that agree with every given term.
fn matching_rows<'m>(submodel: &'m MCA, related: &'m [Term]) -> impl Iterator<Item=usize> + 'm {
    (0..submodel.len()).filter(move |&row| related.iter().all(|term| submodel.value(row, term.parameter) == Some(term.value)))
}

impl<'a> ModelGenerator<'a> {
    fn new(sut: &'a SUT, model: ModelId, context: &'a Context<'a>) -> Self {
        let spec = sut.model(model);
        let mut parameters = spec.parameters().to_vec();
        parameters.sort_by_key(|&id| sut.parameter(id).sequence());

        let mut declared = Vec::new();
        let mut slots: Vec<Slot> = Vec::with_capacity(parameters.len() + spec.submodels().len());
        for &id in &parameters {
            let parameter = sut.parameter(id);
            declared.push(if parameter.is_expected_result() { Some(1) } else { parameter.order() });
            slots.push(Slot {
                id,
                value_count: parameter.value_count(),
                order: 0,
                weights: parameter.weights(),
                submodel: None,
                combinations: Vec::new(),
            });
        }

        let pseudo_base = sut.parameters().len();
        for (index, &child) in spec.submodels().iter().enumerate() {
            let results = sut.model(child).results();
            declared.push(None);
            slots.push(Slot {
                id: ParameterId::from_usize(pseudo_base + index),
                value_count: results.len(),
                order: 0,
                weights: None,
                submodel: Some(results),
                combinations: Vec::new(),
            });
        }

        let count = slots.len().max(1);
        let orders: Vec<usize> = declared.into_iter()
            .map(|declared| match spec.generation() {
                GenerationType::MixedOrder => declared.unwrap_or_else(|| spec.order()),
                GenerationType::FixedOrder => spec.order(),
                GenerationType::Full => count,
                GenerationType::Flat | GenerationType::Random => 1,
            })
            .map(|order| order.clamp(1, count))
            .collect();
        for (slot, order) in slots.iter_mut().zip(reachable_orders(orders)) {
            slot.order = order;
        }

        let lookup = slots.iter().enumerate().map(|(index, slot)| (slot.id, index)).collect();
        Self {
            sut,
            model,
            context,
            bindings: BindingTable::new(slots.len()),
            slots,
            lookup,
            exclusions: ExclusionSet::new(),
            local_exclusions: Vec::new(),
            seeds: VecDeque::new(),
            combinations: Vec::new(),
            open: OpenCells::new(),
            total_combinations: 0,
            random: Random::new(spec.seed()),
            scratch: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn generate(mut self) -> Result<MCA, GenerationError> {
        if self.slots.is_empty() {
            return Ok(MCA::default());
        }
        if let Some(slot) = self.slots.iter().find(|slot| slot.value_count == 0) {
            warn!(model = %self.model, parameter = %slot.id, "A sub-model has no rows, no rows can be generated");
            return Ok(self.into_results());
        }

        self.check_row_limit()?;
        sub_time_it!(self.collect_exclusions(), "Exclusions")?;
        self.collect_seeds();
        sub_time_it!(self.build_combinations(), "Combinations")?;
        self.process_exclusions()?;
        self.total_combinations = self.open.count();
        debug!(
            model = %self.model,
            parameters = self.slots.len(),
            combinations = self.combinations.len(),
            open = self.total_combinations,
            seeds = self.seeds.len(),
            "Model prepared"
        );

        sub_time_it!(self.run(), "Rows")?;
        Ok(self.into_results())
    }

    fn generation(&self) -> GenerationType {
        self.sut.model(self.model).generation()
    }

    /// Whether the row, one value per slot, matches a local exclusion.
    fn violates(&self, row: &[usize]) -> bool {
        self.local_exclusions.iter().any(|terms| terms.iter().all(|&(slot, value)| row[slot] == value))
    }

    fn check_row_limit(&self) -> Result<(), GenerationError> {
        if self.generation() != GenerationType::Full {
            return Ok(());
        }
        let mut rows: u64 = 1;
        for slot in &self.slots {
            rows = rows.saturating_mul(slot.value_count as u64);
            if rows > MAX_ROWS_TO_GENERATE {
                return Err(GenerationError::TooManyRows { limit: MAX_ROWS_TO_GENERATE });
            }
        }
        Ok(())
    }

    fn is_known(&self, parameter: ParameterId) -> bool {
        self.lookup.contains_key(&parameter)
            || self.slots.iter().filter_map(|slot| slot.submodel).any(|submodel| submodel.column_of(parameter).is_some())
    }

    /// Gather the exclusions of the model, in terms of its own parameters and pseudo-parameters.
    fn collect_exclusions(&mut self) -> Result<(), GenerationError> {
        let mut exclusions = ExclusionSet::new();
        for exclusion in self.sut.model(self.model).exclusions() {
            if exclusion.parameters().all(|parameter| self.is_known(parameter)) {
                exclusions.insert(exclusion.clone());
            } else {
                debug!(model = %self.model, %exclusion, "Skipping exclusion on parameters outside the model");
            }
        }

        let mapped = self.map_exclusions(&mut exclusions);
        let conflicts = self.exclude_conflicts(&mut exclusions);
        if mapped || conflicts {
            exclusions = self.derive(exclusions)?;
        }

        if exclusions.iter().any(Exclusion::is_empty) {
            return Err(GenerationError::Failure("the exclusions rule out every row".to_string()));
        }

        self.local_exclusions = exclusions.iter()
            .filter_map(|exclusion| {
                exclusion.terms().iter()
                    .map(|term| {
                        let slot = *self.lookup.get(&term.parameter)?;
                        (term.value < self.slots[slot].value_count).then(|| (slot, term.value))
                    })
                    .collect::<Option<Vec<_>>>()
            })
            .collect();
        self.exclusions = exclusions;
        Ok(())
    }

    /// Rewrite exclusions on parameters of sub-models into exclusions on the rows of those sub-models.
    fn map_exclusions(&self, exclusions: &mut ExclusionSet) -> bool {
        let mut changed = false;
        for slot in &self.slots {
            let submodel = match slot.submodel {
                Some(submodel) => submodel,
                None => continue,
            };

            let mut result = ExclusionSet::new();
            for exclusion in std::mem::take(exclusions) {
                let (related, unrelated): (Vec<Term>, Vec<Term>) = exclusion.terms().iter().copied()
                    .partition(|term| submodel.column_of(term.parameter).is_some());
                if related.is_empty() {
                    result.insert(exclusion);
                    continue;
                }

                changed = true;
                for row in matching_rows(submodel, &related) {
                    let mut mapped = Exclusion::new(unrelated.iter().copied());
                    mapped.insert(Term::new(slot.id, row));
                    result.insert(mapped);
                }
            }
            *exclusions = result;
        }
        changed
    }

    /// Sub-models sharing a parameter may only be combined on rows that agree on it.
    fn exclude_conflicts(&self, exclusions: &mut ExclusionSet) -> bool {
        let pseudo: Vec<(ParameterId, &MCA)> = self.slots.iter()
            .filter_map(|slot| slot.submodel.map(|submodel| (slot.id, submodel)))
            .collect();

        let mut changed = false;
        for (at, &(first, left)) in pseudo.iter().enumerate() {
            for &(second, right) in &pseudo[at + 1..] {
                for (left_column, &parameter) in left.columns.iter().enumerate() {
                    let right_column = match right.column_of(parameter) {
                        Some(column) => column,
                        None => continue,
                    };
                    for (left_value, left_row) in left.rows.iter().enumerate() {
                        for (right_value, right_row) in right.rows.iter().enumerate() {
                            if left_row[left_column] != right_row[right_column] {
                                exclusions.insert(Exclusion::new([Term::new(first, left_value), Term::new(second, right_value)]));
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        changed
    }

    fn derive(&self, exclusions: ExclusionSet) -> Result<ExclusionSet, GenerationError> {
        let value_counts: HashMap<ParameterId, usize> = self.slots.iter().map(|slot| (slot.id, slot.value_count)).collect();
        let parameters = self.slots.iter().map(|slot| slot.id).collect();
        let mut deriver = ExclusionDeriver::new(&value_counts, parameters, self.context.abort);
        for exclusion in exclusions {
            deriver.add_exclusion(exclusion);
        }
        deriver.derive()?;
        Ok(deriver.into_exclusions())
    }

    /// Gather the seeds of the model, dropping those that violate an exclusion and then those contained in others.
    fn collect_seeds(&mut self) {
        let spec = self.sut.model(self.model);
        let mut seeds = if self.generation() == GenerationType::Flat {
            if !spec.seeds().is_empty() {
                warn!(model = %self.model, "Seeds are ignored when generating flat");
            }
            self.flat_seeds()
        } else {
            spec.seeds().to_vec()
        };
        self.map_seeds(&mut seeds);

        for seed in &mut seeds {
            seed.retain(|term| match self.lookup.get(&term.parameter) {
                Some(&slot) => term.value < self.slots[slot].value_count,
                None => false,
            });
        }

        seeds.retain(|seed| !seed.is_empty());
        seeds.retain(|seed| {
            let violating = self.exclusions.iter().any(|exclusion| seed.violates(exclusion));
            if violating {
                warn!(model = %self.model, ?seed, "Dropped a seed that violates an exclusion");
            }
            !violating
        });

        let mut at = 0;
        while at < seeds.len() {
            let mut other = 0;
            while other < seeds.len() {
                if other != at && seeds[at].contains(&seeds[other]) {
                    seeds.remove(other);
                    if other < at {
                        at -= 1;
                    }
                } else {
                    other += 1;
                }
            }
            at += 1;
        }

        self.seeds = seeds.iter()
            .map(|seed| seed.terms().map(|term| (self.lookup[&term.parameter], term.value)).collect())
            .collect();
    }

    /// One seed per value index, so the rows walk through the values in order.
    fn flat_seeds(&self) -> Vec<RowSeed> {
        let most = self.slots.iter().map(|slot| slot.value_count).max().unwrap_or(0);
        (0..most)
            .map(|value| {
                self.slots.iter()
                    .filter(|slot| slot.value_count > value)
                    .map(|slot| Term::new(slot.id, value))
                    .collect()
            })
            .collect()
    }

    /// Rewrite seeds on parameters of sub-models into seeds on the rows of those sub-models.
    fn map_seeds(&self, seeds: &mut Vec<RowSeed>) {
        for slot in &self.slots {
            let submodel = match slot.submodel {
                Some(submodel) => submodel,
                None => continue,
            };

            let mut result = Vec::with_capacity(seeds.len());
            let mut mapped = Vec::new();
            for seed in seeds.drain(..) {
                let (related, unrelated): (Vec<Term>, Vec<Term>) = seed.terms().copied()
                    .partition(|term| submodel.column_of(term.parameter).is_some());
                if related.is_empty() {
                    result.push(seed);
                    continue;
                }
                let before = mapped.len();
                for row in matching_rows(submodel, &related) {
                    let mut mapped_seed = RowSeed::new(unrelated.iter().copied());
                    mapped_seed.insert(Term::new(slot.id, row));
                    mapped.push(mapped_seed);
                }
                if mapped.len() == before {
                    warn!(model = %self.model, ?seed, "Dropped a seed that no row of a sub-model agrees with");
                }
            }
            result.extend(mapped);
            *seeds = result;
        }
    }

    fn add_combination(&mut self, members: &[usize], fill: Cell) -> Result<usize, GenerationError> {
        let id = self.combinations.len();
        let members: Vec<(usize, usize)> = members.iter().map(|&slot| (slot, self.slots[slot].value_count)).collect();
        let combination = Combination::new(id, &members, fill, &mut self.open)?;
        for &(slot, _) in &members {
            self.slots[slot].combinations.push(id);
        }
        self.combinations.push(combination);
        Ok(id)
    }

    /// Create a combination for every group of parameters that has to be covered jointly.
    fn build_combinations(&mut self) -> Result<(), GenerationError> {
        let mut by_order: Vec<usize> = (0..self.slots.len()).collect();
        by_order.sort_by(|&a, &b| self.slots[b].order.cmp(&self.slots[a].order));
        let orders: Vec<usize> = by_order.iter().map(|&slot| self.slots[slot].order).collect();

        for pc in PCList::new(&orders).pcs {
            let mut members: Vec<usize> = pc.into_iter().map(|at| by_order[at]).collect();
            members.sort_unstable();
            self.add_combination(&members, Cell::Open)?;
        }
        Ok(())
    }

    /// Mark the excluded cells of every combination that contains all parameters of an exclusion.
    ///
    /// Exclusions that no combination contains get a dedicated combination without open cells.
    fn process_exclusions(&mut self) -> Result<(), GenerationError> {
        let mut applied = vec![false; self.combinations.len()];
        for at in 0..self.local_exclusions.len() {
            let members: Vec<usize> = self.local_exclusions[at].iter().map(|&(slot, _)| slot).collect();
            let mut targets: Vec<usize> = self.slots[members[0]].combinations.iter()
                .copied()
                .filter(|&combination| members.iter().all(|&slot| self.combinations[combination].contains(slot)))
                .collect();
            if targets.is_empty() {
                let mut sorted = members.clone();
                sorted.sort_unstable();
                targets.push(self.add_combination(&sorted, Cell::Covered)?);
                applied.push(false);
            }

            for combination in targets {
                if applied[combination] {
                    continue;
                }
                for exclusion in &self.local_exclusions {
                    self.combinations[combination].apply_exclusion(exclusion, &mut self.open);
                }
                applied[combination] = true;
            }
        }
        Ok(())
    }
}
