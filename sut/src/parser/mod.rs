// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fmt::Debug;
use std::path::Path;

use nom::branch::alt;
use nom::bytes::complete::{is_a, take_while1};
use nom::character::complete::{digit1, multispace0};
use nom::combinator::{map, map_res, opt};
use nom::multi::many0;
use nom::IResult;
use tracing::{debug, warn};

use common::{ModelId, Term, NEGATIVE_PREFIX};

use crate::{fully_excluded_parameter, negative_exclusions, single_value_parameters};
use crate::{DefinitionError, Exclusion, Parameter, RowSeed, DEFAULT_ORDER, SUT};

pub(crate) mod constraints;
pub(crate) mod parameters;
pub(crate) mod seeds;

pub use seeds::{parse_result, parse_seeds, parse_seeds_file};

fn e2s<T: Debug>(e: T) -> String {
    format!("{:?}", e)
}

fn is_value_char(input: char) -> bool {
    matches!(input, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '/')
}

fn read_value(input: &str) -> IResult<&str, &str> {
    let (input, _) = opt(is_a(" \t\r\n"))(input)?;
    let (input, result) = take_while1(is_value_char)(input)?;
    let (input, _) = opt(is_a(" \t\r\n"))(input)?;
    Ok((input, result))
}

fn read_number(input: &str) -> IResult<&str, usize> {
    let (input, _) = multispace0(input)?;
    let (input, number) = map_res(digit1, |digits: &str| digits.parse::<usize>())(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, number))
}

/// A value as written in a parameter line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawValue<'a> {
    pub(crate) label: &'a str,
    pub(crate) negative: bool,
    pub(crate) weight: Option<u32>,
}

/// A parameter line before it is checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawParameter<'a> {
    pub(crate) name: &'a str,
    pub(crate) expected_result: bool,
    pub(crate) order: Option<usize>,
    pub(crate) values: Vec<RawValue<'a>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Statement<'a> {
    Parameter(RawParameter<'a>),
    Submodel(Vec<&'a str>, Option<usize>),
    Exclude(Vec<(&'a str, &'a str)>),
}

fn parse_statements(text: &str) -> Result<Vec<Statement>, DefinitionError> {
    let (rest, statements) = many0(alt((
        map(constraints::parse_exclusion, Statement::Exclude),
        map(constraints::parse_submodel, |(names, order)| Statement::Submodel(names, order)),
        map(parameters::parse_parameter, Statement::Parameter),
    )))(text).map_err(|e| DefinitionError::Syntax(e2s(e)))?;

    let rest = rest.trim();
    if !rest.is_empty() {
        let line = rest.lines().next().unwrap_or(rest);
        return Err(DefinitionError::Syntax(format!("could not parse '{}'", line)));
    }
    Ok(statements)
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A parsed model file.
#[derive(Clone, Debug)]
pub struct Definition {
    /// The parameters and models.
    pub sut: SUT,
    /// The model to generate.
    pub root: ModelId,
    /// The exclusions as written, followed by those implied by negative values.
    pub exclusions: Vec<Exclusion>,
    /// The seed rows; [parse_definition] leaves this empty, see [parse_seeds].
    pub seeds: Vec<RowSeed>,
    implicit_orders: Vec<ModelId>,
}

impl Definition {
    /// Set the order of the root model, or the highest possible order when `None`.
    ///
    /// The order is clamped to the number of sub-models, or to the number of input parameters without sub-models.
    /// Sub-models declared without an order follow, clamped to their own size.
    pub fn set_order(&mut self, order: Option<usize>) -> Result<(), DefinitionError> {
        let root = self.sut.model(self.root);
        let limit = if root.submodels().is_empty() {
            root.parameters().iter().filter(|&&p| !self.sut.parameter(p).is_expected_result()).count().max(1)
        } else {
            root.submodels().len()
        };
        let order = order.unwrap_or(limit).min(limit);
        self.sut.set_order(self.root, order)?;

        for &model in &self.implicit_orders {
            let size = self.sut.model(model).parameters().len();
            self.sut.set_order(model, order.min(size))?;
        }
        debug!("Root order set to {}", order);
        Ok(())
    }
}

fn lookup_term(sut: &SUT, name: &str, value: &str) -> Result<Term, DefinitionError> {
    let parameter = sut.find_parameter(name).ok_or_else(|| DefinitionError::UnknownParameter(name.to_string()))?;
    let label = value.strip_prefix(NEGATIVE_PREFIX).unwrap_or(value);
    let index = sut.parameter(parameter).value_index(label).ok_or_else(|| DefinitionError::UnknownValue {
        parameter: name.to_string(),
        value: value.to_string(),
    })?;
    Ok(Term::new(parameter, index))
}

fn build_parameter(raw: &RawParameter) -> Parameter {
    let labels = raw.values.iter().map(|v| v.label.to_string()).collect();
    let negative: Vec<usize> = raw.values.iter().enumerate().filter(|(_, v)| v.negative).map(|(i, _)| i).collect();
    let mut parameter = Parameter::with_labels(raw.name, labels).with_negative(&negative);
    if raw.values.iter().any(|v| v.weight.is_some()) {
        parameter = parameter.with_weights(raw.values.iter().map(|v| v.weight.unwrap_or(1)).collect());
    }
    if let Some(order) = raw.order {
        parameter = parameter.with_order(order);
    }
    if raw.expected_result {
        parameter = parameter.as_expected_result();
    }
    parameter
}

/// Parse the contents of a model file.
///
/// The root model gets order [DEFAULT_ORDER], clamped to its size; use [Definition::set_order] to change it.
pub fn parse_definition(text: &str) -> Result<Definition, DefinitionError> {
    let text = strip_comments(text);
    let statements = parse_statements(&text)?;

    let raw_parameters: Vec<&RawParameter> = statements.iter()
        .filter_map(|s| if let Statement::Parameter(p) = s { Some(p) } else { None })
        .collect();
    if raw_parameters.is_empty() {
        return Err(DefinitionError::Syntax("no parameters defined".to_string()));
    }
    let submodels: Vec<(&Vec<&str>, Option<usize>)> = statements.iter()
        .filter_map(|s| if let Statement::Submodel(names, order) = s { Some((names, *order)) } else { None })
        .collect();

    for (names, _) in &submodels {
        for name in names.iter() {
            if !raw_parameters.iter().any(|p| p.name == *name) {
                return Err(DefinitionError::UnknownParameter(name.to_string()));
            }
        }
    }

    let mut sut = SUT::new();
    let root = sut.add_model("root", 0);
    let mut implicit_orders = Vec::new();
    let mut declared = Vec::with_capacity(submodels.len());
    for (index, (names, order)) in submodels.iter().enumerate() {
        let model = sut.add_model(format!("submodel{}", index), 0);
        match order {
            Some(order) if *order > names.len() => return Err(DefinitionError::BadOrder(*order)),
            Some(order) => sut.attach_child(root, model, *order)?,
            None => {
                sut.attach_child(root, model, DEFAULT_ORDER.min(names.len().max(1)))?;
                implicit_orders.push(model);
            }
        }
        declared.push(model);
    }

    for raw in &raw_parameters {
        let parameter = build_parameter(raw);
        let owners: Vec<ModelId> = submodels.iter().zip(&declared)
            .filter(|((names, _), _)| names.contains(&raw.name))
            .map(|(_, &model)| model)
            .collect();

        if submodels.is_empty() {
            sut.add_parameter(root, parameter)?;
        } else if let Some((&first, others)) = owners.split_first() {
            let id = sut.add_parameter(first, parameter)?;
            for &model in others {
                sut.share_parameter(model, id)?;
            }
        } else {
            let model = sut.add_model(format!("{}-model", raw.name), 0);
            sut.attach_child(root, model, 1)?;
            sut.add_parameter(model, parameter)?;
        }
    }

    let mut exclusions = Vec::new();
    for statement in &statements {
        if let Statement::Exclude(terms) = statement {
            let exclusion: Exclusion = terms.iter()
                .map(|(name, value)| lookup_term(&sut, name, value))
                .collect::<Result<_, _>>()?;
            if exclusion.parameters().count() != exclusion.len() {
                debug!("Dropping exclusion {} that can never match", exclusion);
                continue;
            }
            exclusions.push(exclusion);
        }
    }
    exclusions.extend(negative_exclusions(&sut));

    if let Some(parameter) = fully_excluded_parameter(&sut, &exclusions) {
        return Err(DefinitionError::EntireParameterExcluded(sut.parameter(parameter).name().to_string()));
    }
    for parameter in single_value_parameters(&sut) {
        warn!("Parameter '{}' has a single value", sut.parameter(parameter).name());
    }

    let mut definition = Definition { sut, root, exclusions, seeds: Vec::new(), implicit_orders };
    definition.set_order(Some(DEFAULT_ORDER))?;
    Ok(definition)
}

/// Read and parse a model file.
pub fn parse_definition_file(path: &Path) -> Result<Definition, DefinitionError> {
    let text = std::fs::read_to_string(path).map_err(|e| DefinitionError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_definition(&text)
}
