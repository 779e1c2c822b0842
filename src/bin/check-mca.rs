// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate contains a binary which checks whether a generated suite covers its model for the provided order.
//!
//! The implementation enumerates every interaction, so only use this for small suites or be ready to wait.

use std::fs::read_to_string;
use std::process::exit;

use combica::cli::{crate_version, parse_check_arguments_from, CheckArguments};
use combica::common::{time_it, Term};
use combica::init_logging;
use combica::mca::verify::{exclusion_violations, uncovered_interactions};
use combica::sut::{parse_definition_file, parse_result, ExclusionDeriver, SUT};

fn never() -> bool {
    false
}

fn render(sut: &SUT, terms: &[Term]) -> String {
    let rendered: Vec<String> = terms.iter()
        .map(|term| {
            let parameter = sut.parameter(term.parameter);
            format!("{} = {}", parameter.name(), parameter.render(term.value))
        })
        .collect();
    rendered.join(" && ")
}

/// Check the suite, returning the number of problems found.
fn check(arguments: &CheckArguments) -> Result<usize, String> {
    let definition = parse_definition_file(&arguments.model_file).map_err(|e| e.to_string())?;
    let sut = &definition.sut;
    let text = read_to_string(&arguments.result_file).map_err(|e| e.to_string())?;
    let mca = parse_result(&text, sut).map_err(|e| e.to_string())?;

    let value_counts = sut.value_counts();
    let mut deriver = ExclusionDeriver::new(&value_counts, sut.tree_parameters(definition.root), &never);
    for exclusion in &definition.exclusions {
        deriver.add_exclusion(exclusion.clone());
    }
    time_it!(deriver.derive(), "Derivation").map_err(|e| e.to_string())?;
    let derived = deriver.into_exclusions();
    let given: Vec<&[Term]> = definition.exclusions.iter().map(|exclusion| exclusion.terms()).collect();
    let implied: Vec<&[Term]> = derived.iter().map(|exclusion| exclusion.terms()).collect();

    let mut problems = 0;
    for (row, terms) in exclusion_violations(&mca, given.iter().copied()) {
        println!("Row {} contains the excluded {}", row + 1, render(sut, &terms));
        problems += 1;
    }

    let columns: Vec<(usize, usize)> = mca.columns.iter()
        .enumerate()
        .filter(|&(_, &parameter)| !sut.parameter(parameter).is_expected_result())
        .map(|(column, &parameter)| (column, sut.parameter(parameter).value_count()))
        .collect();
    let order = arguments.order.unwrap_or(columns.len());
    for terms in time_it!(uncovered_interactions(&mca, &columns, order, &implied), "Coverage") {
        println!("Not covered: {}", render(sut, &terms));
        problems += 1;
    }
    Ok(problems)
}

/// Check the suite given on the command line.
fn main() {
    let arguments = match parse_check_arguments_from("check-mca", crate_version!(), std::env::args_os()) {
        Ok(arguments) => arguments,
        Err(message) => {
            eprintln!("{}", message);
            exit(1);
        }
    };
    init_logging(false);

    match check(&arguments) {
        Ok(0) => println!("The suite is covering."),
        Ok(problems) => {
            println!("Found {} problems.", problems);
            exit(2);
        }
        Err(message) => {
            eprintln!("{}", message);
            exit(1);
        }
    }
}
