// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use common::{MIN_ORDER, NEGATIVE_PREFIX, UNDEFINED_TEXT, UNDEFINED_VALUE};

use crate::DefinitionError;

/// One input dimension of the system under test.
///
/// A parameter does not change once it has been added to a [SUT](crate::SUT).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    sequence: usize,
    labels: Vec<String>,
    negative: Vec<bool>,
    weights: Option<Vec<u32>>,
    order: Option<usize>,
    expected_result: bool,
}

impl Parameter {
    /// Create a parameter with the given number of values, labelled by their index.
    pub fn new<S: Into<String>>(name: S, value_count: usize) -> Self {
        Self::with_labels(name, (0..value_count).map(|v| v.to_string()).collect())
    }

    /// Create a parameter with one value per label.
    pub fn with_labels<S: Into<String>>(name: S, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sequence: 0,
            negative: vec![false; labels.len()],
            labels,
            weights: None,
            order: None,
            expected_result: false,
        }
    }

    /// Override the order of the model for this parameter.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the weight of each value. Weights only break ties between equally good values.
    pub fn with_weights(mut self, weights: Vec<u32>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Mark the given values as negative.
    pub fn with_negative(mut self, negative: &[usize]) -> Self {
        for &value in negative {
            if let Some(flag) = self.negative.get_mut(value) {
                *flag = true;
            }
        }
        self
    }

    /// Mark this parameter as an expected result, which is covered with order one.
    pub fn as_expected_result(mut self) -> Self {
        self.expected_result = true;
        self
    }

    pub(crate) fn set_sequence(&mut self, sequence: usize) {
        self.sequence = sequence;
    }

    pub(crate) fn validate(&self) -> Result<(), DefinitionError> {
        if self.labels.is_empty() {
            return Err(DefinitionError::NoValues(self.name.clone()));
        }
        if let Some(weights) = &self.weights {
            if weights.len() != self.labels.len() {
                return Err(DefinitionError::WeightCount {
                    parameter: self.name.clone(),
                    weights: weights.len(),
                    values: self.labels.len(),
                });
            }
        }
        if let Some(order) = self.order {
            if order < MIN_ORDER {
                return Err(DefinitionError::BadOrder(order));
            }
        }
        Ok(())
    }

    /// The name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The position of this parameter in the input, used to order the columns of the result.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// The number of values.
    pub fn value_count(&self) -> usize {
        self.labels.len()
    }

    /// The labels of the values.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The index of the value with the given label.
    pub fn value_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// The text of a value as it should be printed: negative values prefixed, undefined values as `?`.
    pub fn render(&self, value: usize) -> String {
        if value == UNDEFINED_VALUE {
            return UNDEFINED_TEXT.to_string();
        }
        match self.labels.get(value) {
            Some(label) if self.is_negative(value) => format!("{}{}", NEGATIVE_PREFIX, label),
            Some(label) => label.clone(),
            None => UNDEFINED_TEXT.to_string(),
        }
    }

    /// Whether the given value is negative.
    pub fn is_negative(&self, value: usize) -> bool {
        self.negative.get(value).copied().unwrap_or(false)
    }

    /// The negative values.
    pub fn negative_values(&self) -> impl Iterator<Item=usize> + '_ {
        self.negative.iter().enumerate().filter(|(_, &n)| n).map(|(v, _)| v)
    }

    /// The weights if they were set explicitly.
    pub fn weights(&self) -> Option<&[u32]> {
        self.weights.as_deref()
    }

    /// The weight of a value, one unless set otherwise.
    pub fn weight(&self, value: usize) -> u32 {
        self.weights.as_ref().and_then(|w| w.get(value).copied()).unwrap_or(1)
    }

    /// The order of this parameter if it overrides the order of its model.
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    /// Whether this parameter is an expected result.
    pub fn is_expected_result(&self) -> bool {
        self.expected_result
    }
}
