// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides the System Under Test (SUT): the parameters, models, exclusions and seed rows a test suite is
//! generated for, and the tools to parse them from `*.model` and seed files.
//!
//! # System Under Test
//! The [SUT] is an arena holding every [Parameter] and [Model]; they are referred to by [ParameterId] and [ModelId].
//! Models form a tree: every model owns some parameters and may have sub-models, which are generated first.
//!
//! # Exclusions
//! An [Exclusion] is a set of values that may never appear together. The [ExclusionDeriver] adds the exclusions
//! implied by the others, so the generator never runs into a row it can not finish.
//!
//! # Example
//! ```
//! let definition = sut::parse_definition("
//!     p1: a, b, c;
//!     p2: a, b;
//!     p3: a, b;
//!
//!     $exclude p1 = a && p3 = b;
//! ").expect("Parsing error occurred");
//! let sut = &definition.sut;
//! println!("Number of parameters: {}", sut.parameters().len());
//!
//! let p1 = sut.find_parameter("p1").unwrap();
//! assert_eq!(3, sut.parameter(p1).value_count());
//! assert_eq!(1, definition.exclusions.len());
//! ```

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::collections::HashMap;

use thiserror::Error;

use common::{GenerationType, Id, ModelId, ParameterId};
pub use constraints::deriver::ExclusionDeriver;
pub use constraints::trie::Trie;
pub use constraints::{fully_excluded_parameter, negative_exclusions, single_value_parameters};
pub use exclusion::{Exclusion, ExclusionSet};
pub use model::{Model, DEFAULT_ORDER};
pub use parameter::Parameter;
pub use parser::{parse_definition, parse_definition_file, parse_result, parse_seeds, parse_seeds_file, Definition};
pub use seed::RowSeed;

mod constraints;
mod exclusion;
mod model;
mod parameter;
mod parser;
mod seed;


/// Everything that can be wrong with the definition of a system under test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The text could not be parsed.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A parameter without values.
    #[error("parameter '{0}' has no values")]
    NoValues(String),

    /// The weights do not match the values.
    #[error("parameter '{parameter}' has {weights} weights for {values} values")]
    WeightCount {
        /// The parameter name.
        parameter: String,
        /// The number of weights.
        weights: usize,
        /// The number of values.
        values: usize,
    },

    /// An order of zero.
    #[error("order {0} is not allowed, use at least 1")]
    BadOrder(usize),

    /// Two parameters with the same name.
    #[error("parameter '{0}' is defined more than once")]
    DuplicateParameter(String),

    /// A reference to a parameter that does not exist.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A reference to a value that does not exist.
    #[error("parameter '{parameter}' has no value '{value}'")]
    UnknownValue {
        /// The parameter name.
        parameter: String,
        /// The value as written.
        value: String,
    },

    /// A model that can not be attached to the given parent.
    #[error("model {0} can not be attached there")]
    BadAttachment(ModelId),

    /// Single value exclusions that rule out every value of a parameter.
    #[error("every value of parameter '{0}' is excluded")]
    EntireParameterExcluded(String),

    /// A file could not be read.
    #[error("could not read '{path}': {message}")]
    Io {
        /// The file.
        path: String,
        /// The reason.
        message: String,
    },
}

/// This struct represents the System Under Test (SUT) for which to generate a test suite.
#[derive(Clone, Debug, Default)]
pub struct SUT {
    parameters: Vec<Parameter>,
    models: Vec<Model>,
}

impl SUT {
    /// Create an empty [SUT].
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model without parameters. It becomes part of a tree through [SUT::attach_child].
    pub fn add_model<S: Into<String>>(&mut self, name: S, seed: u64) -> ModelId {
        self.models.push(Model::new(name.into(), seed));
        ModelId::from_usize(self.models.len() - 1)
    }

    /// Add a parameter to the given model.
    ///
    /// Named parameters must have unique names; unnamed parameters are only reachable through their id.
    pub fn add_parameter(&mut self, model: ModelId, mut parameter: Parameter) -> Result<ParameterId, DefinitionError> {
        parameter.validate()?;
        if !parameter.name().is_empty() && self.find_parameter(parameter.name()).is_some() {
            return Err(DefinitionError::DuplicateParameter(parameter.name().to_string()));
        }

        let id = ParameterId::from_usize(self.parameters.len());
        parameter.set_sequence(id.as_usize());
        self.parameters.push(parameter);
        self.models[model.as_usize()].parameters.push(id);
        Ok(id)
    }

    /// Let a model share a parameter that was added to another model.
    ///
    /// Sub-models sharing a parameter are generated independently; their parent only combines rows that agree on it.
    pub fn share_parameter(&mut self, model: ModelId, parameter: ParameterId) -> Result<(), DefinitionError> {
        self.check_parameter(parameter)?;
        let parameters = &mut self.models[model.as_usize()].parameters;
        if !parameters.contains(&parameter) {
            parameters.push(parameter);
        }
        Ok(())
    }

    /// Attach `child` as a sub-model of `parent`, to be generated with the given order.
    ///
    /// The parent order is raised to at least the order of the child.
    pub fn attach_child(&mut self, parent: ModelId, child: ModelId, order: usize) -> Result<(), DefinitionError> {
        if order < common::MIN_ORDER {
            return Err(DefinitionError::BadOrder(order));
        }
        if parent == child || self.models[child.as_usize()].parent.is_some() || self.is_ancestor(child, parent) {
            return Err(DefinitionError::BadAttachment(child));
        }

        self.models[child.as_usize()].order = order;
        self.models[child.as_usize()].parent = Some(parent);
        let parent_model = &mut self.models[parent.as_usize()];
        parent_model.order = parent_model.order.max(order);
        parent_model.submodels.push(child);
        Ok(())
    }

    fn is_ancestor(&self, ancestor: ModelId, mut model: ModelId) -> bool {
        while let Some(parent) = self.models[model.as_usize()].parent {
            if parent == ancestor {
                return true;
            }
            model = parent;
        }
        false
    }

    /// Set the order of a model.
    pub fn set_order(&mut self, model: ModelId, order: usize) -> Result<(), DefinitionError> {
        if order < common::MIN_ORDER {
            return Err(DefinitionError::BadOrder(order));
        }
        self.models[model.as_usize()].order = order;
        Ok(())
    }

    /// Set how a model arranges its combinations, and the row limit for [GenerationType::Flat] and [GenerationType::Random].
    pub fn set_generation(&mut self, model: ModelId, generation: GenerationType, max_rows: Option<usize>) {
        let model = &mut self.models[model.as_usize()];
        model.generation = generation;
        model.max_rows = max_rows;
    }

    /// Set the random seed of a model and all its sub-models.
    pub fn set_seed(&mut self, model: ModelId, seed: u64) {
        for id in self.subtree(model) {
            self.models[id.as_usize()].seed = seed;
        }
    }

    /// The parameter with the given id.
    pub fn parameter(&self, id: ParameterId) -> &Parameter {
        &self.parameters[id.as_usize()]
    }

    /// All parameters, indexed by their id.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Error if the id does not belong to this [SUT].
    pub fn check_parameter(&self, id: ParameterId) -> Result<(), DefinitionError> {
        if id.as_usize() < self.parameters.len() {
            Ok(())
        } else {
            Err(DefinitionError::UnknownParameter(id.to_string()))
        }
    }

    /// The parameter with the given name.
    pub fn find_parameter(&self, name: &str) -> Option<ParameterId> {
        self.parameters.iter().position(|p| p.name() == name).map(ParameterId::from_usize)
    }

    /// The model with the given id.
    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.as_usize()]
    }

    /// The model with the given id.
    pub fn model_mut(&mut self, id: ModelId) -> &mut Model {
        &mut self.models[id.as_usize()]
    }

    /// The number of models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// The given model and everything below it, parents before children.
    pub fn subtree(&self, root: ModelId) -> Vec<ModelId> {
        let mut result = vec![root];
        let mut at = 0;
        while at < result.len() {
            result.extend_from_slice(&self.models[result[at].as_usize()].submodels);
            at += 1;
        }
        result
    }

    /// Every parameter of the given model and its sub-models, sorted on sequence without duplicates.
    pub fn tree_parameters(&self, model: ModelId) -> Vec<ParameterId> {
        let mut result: Vec<ParameterId> = self.subtree(model)
            .into_iter()
            .flat_map(|m| self.models[m.as_usize()].parameters.iter().copied())
            .collect();
        result.sort();
        result.dedup();
        result
    }

    /// Whether the given parameter belongs to the model or one of its sub-models.
    pub fn subtree_contains(&self, model: ModelId, parameter: ParameterId) -> bool {
        self.subtree(model).into_iter().any(|m| self.models[m.as_usize()].parameters.contains(&parameter))
    }

    /// The number of values of every parameter.
    pub fn value_counts(&self) -> HashMap<ParameterId, usize> {
        self.parameters.iter().enumerate()
            .map(|(id, p)| (ParameterId::from_usize(id), p.value_count()))
            .collect()
    }
}
