// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use common::{GenerationType, ModelId, ParameterId};
use mca::MCA;

use crate::{Exclusion, ExclusionSet, RowSeed};

/// The default order of a new model.
pub const DEFAULT_ORDER: usize = 2;

/// A group of parameters generated together, possibly composed of sub-models.
///
/// The exclusions and seeds of a model are filled in when a generation run is prepared,
/// the results once the model has been generated.
#[derive(Clone, Debug)]
pub struct Model {
    name: String,
    pub(crate) order: usize,
    pub(crate) seed: u64,
    pub(crate) generation: GenerationType,
    pub(crate) max_rows: Option<usize>,
    pub(crate) parameters: Vec<ParameterId>,
    pub(crate) submodels: Vec<ModelId>,
    pub(crate) parent: Option<ModelId>,
    exclusions: ExclusionSet,
    seeds: Vec<RowSeed>,
    results: MCA,
}

impl Model {
    pub(crate) fn new(name: String, seed: u64) -> Self {
        Self {
            name,
            order: DEFAULT_ORDER,
            seed,
            generation: GenerationType::default(),
            max_rows: None,
            parameters: Vec::new(),
            submodels: Vec::new(),
            parent: None,
            exclusions: ExclusionSet::new(),
            seeds: Vec::new(),
            results: MCA::default(),
        }
    }

    /// The name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The order used for parameters without an order of their own.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The seed of the random source of this model.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The way combinations are built.
    pub fn generation(&self) -> GenerationType {
        self.generation
    }

    /// The maximum number of rows kept by [GenerationType::Flat] and [GenerationType::Random].
    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }

    /// The parameters owned directly by this model.
    pub fn parameters(&self) -> &[ParameterId] {
        &self.parameters
    }

    /// The direct sub-models.
    pub fn submodels(&self) -> &[ModelId] {
        &self.submodels
    }

    /// The model this model is attached to.
    pub fn parent(&self) -> Option<ModelId> {
        self.parent
    }

    /// The exclusions this model has to enforce itself.
    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// Give this model an exclusion to enforce, returns false if it already had it.
    pub fn add_exclusion(&mut self, exclusion: Exclusion) -> bool {
        self.exclusions.insert(exclusion)
    }

    /// The seed rows offered to this model.
    pub fn seeds(&self) -> &[RowSeed] {
        &self.seeds
    }

    /// Offer a seed row to this model.
    pub fn add_seed(&mut self, seed: RowSeed) {
        self.seeds.push(seed);
    }

    /// Forget exclusions, seeds and results of a previous run.
    pub fn clear(&mut self) {
        self.exclusions.clear();
        self.seeds.clear();
        self.results = MCA::default();
    }

    /// The generated rows.
    pub fn results(&self) -> &MCA {
        &self.results
    }

    /// The generated rows, mutable to move the result cursor.
    pub fn results_mut(&mut self) -> &mut MCA {
        &mut self.results
    }

    /// Store the generated rows.
    pub fn set_results(&mut self, results: MCA) {
        self.results = results;
    }
}
