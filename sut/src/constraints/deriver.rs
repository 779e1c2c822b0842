// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! Derivation of implied exclusions.
//!
//! If every value of a parameter `P` is excluded together with some other values, those other values can not
//! appear together either, whatever `P` becomes. For example `{A=0, B=0}` and `{A=0, B=1}` with `B` having two
//! values imply `{A=0}`. The deriver looks for parameters whose exclusions cover all of their values and merges
//! one exclusion per value into a new one, until nothing new can be found.

use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::{debug, trace};

use common::{GenerationError, ParameterId, Term};

use crate::{Exclusion, ExclusionSet, Trie};

/// Computes the exclusions implied by a collection of exclusions.
pub struct ExclusionDeriver<'a> {
    value_counts: &'a HashMap<ParameterId, usize>,
    parameters: Vec<ParameterId>,
    exclusions: Vec<Exclusion>,
    index: BTreeMap<Vec<Term>, usize>,
    links: HashMap<ParameterId, Vec<usize>>,
    lookup: Trie<Term>,
    worklist: VecDeque<ParameterId>,
    current: Option<ParameterId>,
    deleted: bool,
    abort: &'a dyn Fn() -> bool,
}

impl<'a> ExclusionDeriver<'a> {
    /// Create a deriver for the given parameters.
    ///
    /// `value_counts` has to know every parameter that appears in an exclusion; `abort` is polled while deriving.
    pub fn new(value_counts: &'a HashMap<ParameterId, usize>, parameters: Vec<ParameterId>, abort: &'a dyn Fn() -> bool) -> Self {
        Self {
            value_counts,
            parameters,
            exclusions: Vec::new(),
            index: BTreeMap::new(),
            links: HashMap::new(),
            lookup: Trie::new(),
            worklist: VecDeque::new(),
            current: None,
            deleted: false,
            abort,
        }
    }

    /// Add an exclusion before deriving.
    ///
    /// Returns false if the exclusion was already known or an exclusion at least as general was added before.
    pub fn add_exclusion(&mut self, exclusion: Exclusion) -> bool {
        self.insert(exclusion, true).is_some()
    }

    fn insert(&mut self, exclusion: Exclusion, check_general: bool) -> Option<usize> {
        if check_general && self.lookup.contains_subset(exclusion.terms()) {
            return None;
        }
        if self.index.contains_key(exclusion.terms()) {
            return None;
        }

        let position = self.exclusions.len();
        self.lookup.insert(exclusion.terms());
        self.index.insert(exclusion.terms().to_vec(), position);
        self.exclusions.push(exclusion);
        Some(position)
    }

    fn value_count(&self, parameter: ParameterId) -> usize {
        self.value_counts.get(&parameter).copied().unwrap_or(usize::MAX)
    }

    fn exclusion_count(&self, parameter: ParameterId) -> usize {
        self.links.get(&parameter).map_or(0, Vec::len)
    }

    fn link(&mut self, position: usize) {
        let parameters: Vec<ParameterId> = self.exclusions[position].parameters().collect();
        for parameter in parameters {
            self.links.entry(parameter).or_default().push(position);
        }
    }

    fn rebuild_links(&mut self) {
        self.links.clear();
        for position in 0..self.exclusions.len() {
            self.link(position);
        }
    }

    fn enqueue_if_saturated(&mut self, parameter: ParameterId) {
        if self.exclusion_count(parameter) >= self.value_count(parameter) && !self.worklist.contains(&parameter) {
            trace!(%parameter, "queued for derivation");
            self.worklist.push_back(parameter);
        }
    }

    /// Add every implied exclusion.
    ///
    /// Exclusions made redundant by a more general one are removed.
    pub fn derive(&mut self) -> Result<(), GenerationError> {
        self.rebuild_links();
        let before = self.exclusions.len();

        for at in 0..self.parameters.len() {
            self.enqueue_if_saturated(self.parameters[at]);
        }

        while let Some(parameter) = self.worklist.pop_front() {
            self.current = Some(parameter);

            let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); self.value_count(parameter)];
            let mut linked = self.links.get(&parameter).cloned().unwrap_or_default();
            linked.sort_by(|&a, &b| self.exclusions[a].terms().cmp(self.exclusions[b].terms()));
            for position in linked {
                if let Some(value) = self.exclusions[position].value_of(parameter) {
                    if let Some(bucket) = buckets.get_mut(value) {
                        bucket.push(position);
                    }
                }
            }

            if buckets.iter().all(|bucket| !bucket.is_empty()) {
                self.build(Exclusion::default(), &buckets, 0)?;
            }
            self.purge_deleted();
        }

        self.current = None;
        debug!(derived = self.exclusions.len().saturating_sub(before), total = self.exclusions.len(), "derivation finished");
        Ok(())
    }

    fn build(&mut self, implied: Exclusion, buckets: &[Vec<usize>], depth: usize) -> Result<(), GenerationError> {
        if (self.abort)() {
            return Err(GenerationError::Cancelled);
        }
        let current = match self.current {
            Some(current) => current,
            None => return Ok(()),
        };

        if depth < buckets.len() {
            for &position in &buckets[depth] {
                let candidate = &self.exclusions[position];
                if candidate.is_deleted() || !implied.is_consistent_with(candidate, current) {
                    continue;
                }

                let mut merged = implied.clone();
                for term in candidate.terms() {
                    if term.parameter != current {
                        merged.insert(*term);
                    }
                }

                if self.lookup.contains_subset(merged.terms()) {
                    continue;
                }
                self.build(merged, buckets, depth + 1)?;
            }
            return Ok(());
        }

        if let Some(position) = self.insert(implied, false) {
            trace!(exclusion = %self.exclusions[position], "derived");
            self.mark_obsolete(position);
            self.link(position);
            let parameters: Vec<ParameterId> = self.exclusions[position].parameters().collect();
            for parameter in parameters {
                self.enqueue_if_saturated(parameter);
            }
        }
        Ok(())
    }

    fn mark_obsolete(&mut self, position: usize) {
        if self.exclusions[position].is_empty() {
            return;
        }
        for other in 0..self.exclusions.len() {
            if other != position
                && !self.exclusions[other].is_deleted()
                && self.exclusions[position].is_subset_of(&self.exclusions[other])
            {
                self.exclusions[other].mark_deleted();
                self.deleted = true;
            }
        }
    }

    fn purge_deleted(&mut self) {
        if !self.deleted {
            return;
        }
        self.deleted = false;

        for exclusion in self.exclusions.iter().filter(|e| e.is_deleted()) {
            self.lookup.erase(exclusion.terms());
        }
        self.exclusions.retain(|e| !e.is_deleted());
        self.index = self.exclusions.iter().enumerate().map(|(at, e)| (e.terms().to_vec(), at)).collect();
        self.rebuild_links();
    }

    /// The exclusions currently known.
    pub fn exclusions(&self) -> impl Iterator<Item=&Exclusion> {
        self.exclusions.iter().filter(|e| !e.is_deleted())
    }

    /// Finish and return the exclusions.
    pub fn into_exclusions(self) -> ExclusionSet {
        self.exclusions.into_iter().filter(|e| !e.is_deleted()).collect()
    }
}
