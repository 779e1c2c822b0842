// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use tracing::{debug, info};

use common::{time_it, GenerationError, GenerationMode, ModelId, ParameterId, Term, DEFAULT_MAX_RANDOM_TRIES};
use mca::MCA;
use sut::{Definition, DefinitionError, Exclusion, ExclusionDeriver, ExclusionSet, Parameter, RowSeed, SUT};

use crate::{generate_model, Context};

fn never() -> bool {
    false
}

/// One generation request: the models, the exclusions and seeds over all of them, and the generation settings.
///
/// Exclusions and seeds are kept at the task level. [Task::prepare_for_generation] derives the implied exclusions and
/// hands every exclusion to the lowest model that holds all its parameters; every model receives all seeds.
pub struct Task {
    sut: SUT,
    root: Option<ModelId>,
    exclusions: ExclusionSet,
    seeds: Vec<RowSeed>,
    mode: GenerationMode,
    max_random_tries: usize,
    abort: Option<Box<dyn Fn() -> bool>>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            sut: SUT::new(),
            root: None,
            exclusions: ExclusionSet::new(),
            seeds: Vec::new(),
            mode: GenerationMode::Regular,
            max_random_tries: DEFAULT_MAX_RANDOM_TRIES,
            abort: None,
        }
    }
}

impl Task {
    /// Create an empty task in [GenerationMode::Regular].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a task for a parsed model file.
    pub fn from_definition(definition: Definition) -> Self {
        Self {
            sut: definition.sut,
            root: Some(definition.root),
            exclusions: definition.exclusions.into_iter().collect(),
            seeds: definition.seeds,
            ..Self::default()
        }
    }

    /// The models and parameters.
    pub fn sut(&self) -> &SUT {
        &self.sut
    }

    /// Mutable access to the models and parameters, for settings the task does not wrap.
    pub fn sut_mut(&mut self) -> &mut SUT {
        &mut self.sut
    }

    /// Create a model with the given random seed. The first model created becomes the root.
    pub fn create_model(&mut self, seed: u64) -> ModelId {
        let model = self.sut.add_model(format!("model{}", self.sut.model_count()), seed);
        self.root.get_or_insert(model);
        model
    }

    /// Choose the model whose rows are the result.
    pub fn set_root(&mut self, model: ModelId) {
        self.root = Some(model);
    }

    /// The model whose rows are the result.
    pub fn root(&self) -> Option<ModelId> {
        self.root
    }

    /// Add an unnamed parameter to the model.
    pub fn add_parameter(
        &mut self,
        model: ModelId,
        value_count: usize,
        order: Option<usize>,
        weights: Option<&[u32]>,
    ) -> Result<ParameterId, DefinitionError> {
        let mut parameter = Parameter::new("", value_count);
        if let Some(order) = order {
            parameter = parameter.with_order(order);
        }
        if let Some(weights) = weights {
            parameter = parameter.with_weights(weights.to_vec());
        }
        self.sut.add_parameter(model, parameter)
    }

    /// Make `child` a sub-model of `parent`, generated with the given order.
    pub fn attach_child(&mut self, parent: ModelId, child: ModelId, order: usize) -> Result<(), DefinitionError> {
        self.sut.attach_child(parent, child, order)
    }

    fn check_terms(&self, terms: &[Term]) -> Result<(), DefinitionError> {
        for term in terms {
            self.sut.check_parameter(term.parameter)?;
            if term.value >= self.sut.parameter(term.parameter).value_count() {
                return Err(DefinitionError::UnknownValue {
                    parameter: term.parameter.to_string(),
                    value: term.value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Forbid the given values to appear together. Returns false if the exclusion was known already.
    pub fn add_exclusion(&mut self, terms: &[Term]) -> Result<bool, DefinitionError> {
        self.check_terms(terms)?;
        Ok(self.exclusions.insert(Exclusion::new(terms.iter().copied())))
    }

    /// Require a row holding the given values, unless they violate an exclusion.
    pub fn add_seed(&mut self, terms: &[Term]) -> Result<(), DefinitionError> {
        self.check_terms(terms)?;
        self.seeds.push(RowSeed::new(terms.iter().copied()));
        Ok(())
    }

    /// Set how strictly rows are built.
    pub fn set_generation_mode(&mut self, mode: GenerationMode) {
        self.mode = mode;
    }

    /// The mode rows are built in.
    pub fn generation_mode(&self) -> GenerationMode {
        self.mode
    }

    /// Set the number of random rows tried for every row in [GenerationMode::Approximate].
    pub fn set_max_random_tries(&mut self, tries: usize) {
        self.max_random_tries = tries;
    }

    /// Set a predicate that is polled during generation; returning true cancels it.
    pub fn set_abort<F: Fn() -> bool + 'static>(&mut self, abort: F) {
        self.abort = Some(Box::new(abort));
    }

    fn root_or_fail(&self) -> Result<ModelId, GenerationError> {
        self.root.ok_or_else(|| GenerationError::Failure("no root model was set".to_string()))
    }

    /// The lowest model whose tree holds every parameter of the exclusion.
    fn matching_model(&self, exclusion: &Exclusion, model: ModelId) -> Option<ModelId> {
        self.sut.model(model).submodels().iter()
            .find_map(|&child| self.matching_model(exclusion, child))
            .or_else(|| exclusion.parameters().all(|p| self.sut.subtree_contains(model, p)).then(|| model))
    }

    /// Derive the implied exclusions and distribute exclusions and seeds over the models.
    ///
    /// Results of an earlier run are discarded.
    pub fn prepare_for_generation(&mut self) -> Result<(), GenerationError> {
        let root = self.root_or_fail()?;
        let models = self.sut.subtree(root);
        for &model in &models {
            self.sut.model_mut(model).clear();
        }

        let abort: &dyn Fn() -> bool = match &self.abort {
            Some(abort) => &**abort,
            None => &never,
        };
        let value_counts = self.sut.value_counts();
        let mut deriver = ExclusionDeriver::new(&value_counts, self.sut.tree_parameters(root), abort);
        for exclusion in &self.exclusions {
            deriver.add_exclusion(exclusion.clone());
        }
        time_it!(deriver.derive(), "Derivation")?;
        let exclusions = deriver.into_exclusions();
        info!(given = self.exclusions.len(), total = exclusions.len(), "Exclusions derived");

        if exclusions.iter().any(Exclusion::is_empty) {
            return Err(GenerationError::Failure("the exclusions rule out every row".to_string()));
        }
        for exclusion in exclusions {
            let model = self.matching_model(&exclusion, root).ok_or_else(|| {
                GenerationError::Failure(format!("exclusion {} uses parameters outside the root model", exclusion))
            })?;
            debug!(%exclusion, %model, "Exclusion routed");
            self.sut.model_mut(model).add_exclusion(exclusion);
        }

        for &model in &models {
            for seed in &self.seeds {
                self.sut.model_mut(model).add_seed(seed.clone());
            }
        }
        Ok(())
    }

    /// Generate the rows of the root model, sub-models first.
    pub fn generate(&mut self) -> Result<(), GenerationError> {
        self.prepare_for_generation()?;
        let root = self.root_or_fail()?;
        let abort: &dyn Fn() -> bool = match &self.abort {
            Some(abort) => &**abort,
            None => &never,
        };
        let context = Context { mode: self.mode, max_random_tries: self.max_random_tries, abort, root };
        time_it!(generate_tree(&mut self.sut, root, &context), "Generation")?;
        self.sut.model_mut(root).results_mut().reset();
        Ok(())
    }

    /// The number of parameters in the tree of the root model, the length of every result row.
    pub fn total_parameter_count(&self) -> usize {
        self.root.map_or(0, |root| self.sut.tree_parameters(root).len())
    }

    /// Restart [Task::next_result_row] at the first row.
    pub fn reset_result_fetching(&mut self) {
        if let Some(root) = self.root {
            self.sut.model_mut(root).results_mut().reset();
        }
    }

    /// Copy the next result row into `buffer`, which must hold [Task::total_parameter_count] values.
    ///
    /// Returns the number of rows left including the copied one; zero once all rows were fetched.
    pub fn next_result_row(&mut self, buffer: &mut [usize]) -> usize {
        match self.root {
            Some(root) => self.sut.model_mut(root).results_mut().copy_next_row(buffer),
            None => 0,
        }
    }

    /// The rows of the root model.
    pub fn results(&self) -> Option<&MCA> {
        self.root.map(|root| self.sut.model(root).results())
    }
}

fn generate_tree(sut: &mut SUT, model: ModelId, context: &Context) -> Result<(), GenerationError> {
    for child in sut.model(model).submodels().to_vec() {
        generate_tree(sut, child, context)?;
    }
    generate_model(sut, model, context)
}
