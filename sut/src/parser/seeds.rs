// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::path::Path;

use tracing::warn;

use common::{ParameterId, Term, NEGATIVE_PREFIX, UNDEFINED_TEXT, UNDEFINED_VALUE};
use mca::MCA;

use crate::{DefinitionError, RowSeed, SUT};

fn cells(line: &str) -> impl Iterator<Item=&str> {
    line.trim_end_matches(['\r', '\n']).split('\t').map(str::trim)
}

fn label(cell: &str) -> Option<&str> {
    let cell = cell.strip_prefix(NEGATIVE_PREFIX).unwrap_or(cell);
    if cell.is_empty() || cell == UNDEFINED_TEXT {
        None
    } else {
        Some(cell)
    }
}

/// Parse tab separated seed rows: a header naming the parameters, then one seed per line.
///
/// Empty cells leave the parameter free. Unknown parameters and values are skipped with a warning.
pub fn parse_seeds(text: &str, sut: &SUT) -> Vec<RowSeed> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<Option<ParameterId>> = match lines.next() {
        Some(line) => cells(line).map(|name| {
            let parameter = sut.find_parameter(name);
            if parameter.is_none() {
                warn!("Seed column '{}' is not a parameter, ignoring it", name);
            }
            parameter
        }).collect(),
        None => return Vec::new(),
    };

    let mut seeds = Vec::new();
    for line in lines {
        let mut seed = RowSeed::default();
        for (&column, cell) in header.iter().zip(cells(line)) {
            let (parameter, label) = match (column, label(cell)) {
                (Some(parameter), Some(label)) => (parameter, label),
                _ => continue,
            };
            match sut.parameter(parameter).value_index(label) {
                Some(value) => {
                    seed.insert(Term::new(parameter, value));
                }
                None => warn!("Parameter '{}' has no value '{}', ignoring it", sut.parameter(parameter).name(), label),
            }
        }
        if !seed.is_empty() {
            seeds.push(seed);
        }
    }
    seeds
}

/// Read and parse a seed file.
pub fn parse_seeds_file(path: &Path, sut: &SUT) -> Result<Vec<RowSeed>, DefinitionError> {
    let text = std::fs::read_to_string(path).map_err(|e| DefinitionError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(parse_seeds(&text, sut))
}

/// Parse a generated test suite, written in the same layout as seed rows, back into an [MCA].
///
/// Unlike seeds, unknown parameters and values are errors. Empty and undefined cells become [UNDEFINED_VALUE].
pub fn parse_result(text: &str, sut: &SUT) -> Result<MCA, DefinitionError> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let columns: Vec<ParameterId> = match lines.next() {
        Some(line) => cells(line)
            .map(|name| sut.find_parameter(name).ok_or_else(|| DefinitionError::UnknownParameter(name.to_string())))
            .collect::<Result<_, _>>()?,
        None => return Ok(MCA::new(Vec::new(), Vec::new())),
    };

    let mut rows = Vec::new();
    for line in lines {
        let mut row = vec![UNDEFINED_VALUE; columns.len()];
        for (value, (&parameter, cell)) in row.iter_mut().zip(columns.iter().zip(cells(line))) {
            if let Some(label) = label(cell) {
                let parameter = sut.parameter(parameter);
                *value = parameter.value_index(label).ok_or_else(|| DefinitionError::UnknownValue {
                    parameter: parameter.name().to_string(),
                    value: label.to_string(),
                })?;
            }
        }
        rows.push(row);
    }
    Ok(MCA::new(columns, rows))
}
