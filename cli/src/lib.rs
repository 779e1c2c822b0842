// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides the command line of Combica: the arguments, their validation and loading the model they name.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::crate_version;
use clap::{App, Arg, ArgMatches};
use tracing::debug;

use common::{GenerationMode, GenerationType, DEFAULT_MAX_RANDOM_TRIES, MIN_ORDER};
use sut::{parse_definition_file, parse_seeds_file, Definition, DEFAULT_ORDER};

const MODEL_FILE_ARG: &str = "model_file";
const ORDER_ARG: &str = "order";
const MODE_ARG: &str = "mode";
const TRIES_ARG: &str = "tries";
const GENERATION_ARG: &str = "generation";
const MAX_ROWS_ARG: &str = "max-rows";
const RANDOM_SEED_ARG: &str = "random-seed";
const SEED_FILE_ARG: &str = "seed-file";
const OUTPUT_FILE_ARG: &str = "output_file";
const STATISTICS_ARG: &str = "statistics";
const VERBOSE_ARG: &str = "verbose";
const MAX_ORDER_TEXT: &str = "max";

/// The validated command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arguments {
    /// The model file to generate a test suite for.
    pub model_file: PathBuf,
    /// The order of the root model, `None` for the highest possible order.
    pub order: Option<usize>,
    /// How strictly the exclusions are honoured.
    pub mode: GenerationMode,
    /// The random rows tried in [GenerationMode::Approximate].
    pub max_random_tries: usize,
    /// How the root model arranges its combinations.
    pub generation: GenerationType,
    /// The row limit for [GenerationType::Flat] and [GenerationType::Random].
    pub max_rows: Option<usize>,
    /// The random seed, shared by every model.
    pub random_seed: u64,
    /// A file with seed rows.
    pub seed_file: Option<PathBuf>,
    /// Where to write the suite, standard output when `None`.
    pub output_file: Option<PathBuf>,
    /// Print the coverage statistics instead of the rows.
    pub statistics: bool,
    /// Log debug messages.
    pub verbose: bool,
}

fn get_app<'a, 'b>(app_name: &'a str, version: &'a str) -> App<'a, 'b>
where
    'a: 'b,
{
    App::new(app_name)
        .version(version)
        .about("Generates combinatorial test suites.")
        .arg(
            Arg::with_name(MODEL_FILE_ARG)
                .required(true)
                .help("Set the model file with the definition of the system."),
        )
        .arg(
            Arg::with_name(ORDER_ARG)
                .short("o")
                .long("order")
                .takes_value(true)
                .help("Set the order of combinations, or 'max' for the highest possible order. Defaults to 2."),
        )
        .arg(
            Arg::with_name(MODE_ARG)
                .short("m")
                .long("mode")
                .takes_value(true)
                .possible_values(&["regular", "preview", "approximate"])
                .case_insensitive(true)
                .default_value("regular")
                .help("Set how strictly the exclusions are honoured."),
        )
        .arg(
            Arg::with_name(TRIES_ARG)
                .long("tries")
                .takes_value(true)
                .help("Set the number of random rows tried in approximate mode. Defaults to 1000."),
        )
        .arg(
            Arg::with_name(GENERATION_ARG)
                .short("g")
                .long("generation")
                .takes_value(true)
                .possible_values(&["mixed", "fixed", "full", "flat", "random"])
                .case_insensitive(true)
                .default_value("mixed")
                .help("Set how the combinations of the root model are chosen."),
        )
        .arg(
            Arg::with_name(MAX_ROWS_ARG)
                .long("max-rows")
                .takes_value(true)
                .help("Limit the number of rows of the flat and random generation types."),
        )
        .arg(
            Arg::with_name(RANDOM_SEED_ARG)
                .short("r")
                .long("random-seed")
                .takes_value(true)
                .help("Set the random seed. Defaults to 0."),
        )
        .arg(
            Arg::with_name(SEED_FILE_ARG)
                .short("e")
                .long("seed-file")
                .takes_value(true)
                .help("Use the tab separated rows in the provided file as seeds."),
        )
        .arg(
            Arg::with_name(OUTPUT_FILE_ARG)
                .short("O")
                .long("output")
                .takes_value(true)
                .help("Set the output file. Defaults to the standard output."),
        )
        .arg(
            Arg::with_name(STATISTICS_ARG)
                .short("s")
                .long("statistics")
                .help("Print the generation statistics instead of the rows."),
        )
        .arg(
            Arg::with_name(VERBOSE_ARG)
                .short("v")
                .long("verbose")
                .help("Log what the generator is doing."),
        )
}

fn parse_number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, String> {
    matches.value_of(name)
        .map(|text| text.trim().parse::<T>().map_err(|_| format!("The {} argument should be a number.", name)))
        .transpose()
}

fn validate_args(matches: ArgMatches) -> Result<Arguments, String> {
    let model_file = PathBuf::from(
        matches
            .value_of(MODEL_FILE_ARG)
            .ok_or("The model file should be provided")?,
    );
    let output_file = matches.value_of(OUTPUT_FILE_ARG).map(PathBuf::from);
    if output_file.as_ref() == Some(&model_file) {
        return Err("Model and output should not be the same!".to_string());
    }

    let order = validate_order(&matches)?;
    let mode = matches.value_of(MODE_ARG).unwrap_or("regular").parse::<GenerationMode>()?;
    let generation = matches.value_of(GENERATION_ARG).unwrap_or("mixed").parse::<GenerationType>()?;

    Ok(Arguments {
        model_file,
        order,
        mode,
        max_random_tries: parse_number(&matches, TRIES_ARG)?.unwrap_or(DEFAULT_MAX_RANDOM_TRIES),
        generation,
        max_rows: parse_number(&matches, MAX_ROWS_ARG)?,
        random_seed: parse_number(&matches, RANDOM_SEED_ARG)?.unwrap_or(0),
        seed_file: matches.value_of(SEED_FILE_ARG).map(PathBuf::from),
        output_file,
        statistics: matches.is_present(STATISTICS_ARG),
        verbose: matches.is_present(VERBOSE_ARG),
    })
}

/// Parse the given command line. Prints the help or version and exits when asked for.
pub fn parse_arguments_from<I, T>(app_name: &str, version: &str, args: I) -> Result<Arguments, String>
where
    I: IntoIterator<Item=T>,
    T: Into<OsString> + Clone,
{
    validate_args(get_matches(get_app(app_name, version), args)?)
}

/// Parse the command line of this process.
pub fn parse_arguments(app_name: &str, version: &str) -> Result<Arguments, String> {
    parse_arguments_from(app_name, version, std::env::args_os())
}

/// Read the model file and apply the order, generation type, random seed and seed file of the arguments.
pub fn load_definition(arguments: &Arguments) -> Result<Definition, String> {
    let mut definition = parse_definition_file(&arguments.model_file).map_err(|e| e.to_string())?;
    definition.set_order(arguments.order).map_err(|e| e.to_string())?;
    let root = definition.root;
    definition.sut.set_generation(root, arguments.generation, arguments.max_rows);
    definition.sut.set_seed(root, arguments.random_seed);

    if let Some(seed_file) = &arguments.seed_file {
        let seeds = parse_seeds_file(seed_file, &definition.sut).map_err(|e| e.to_string())?;
        debug!(seeds = seeds.len(), "Seed rows read");
        definition.seeds.extend(seeds);
    }
    Ok(definition)
}

const RESULT_FILE_ARG: &str = "result_file";

/// The validated command line of the checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckArguments {
    /// The model file the suite was generated for.
    pub model_file: PathBuf,
    /// The generated suite.
    pub result_file: PathBuf,
    /// The order to check, `None` for the highest possible order.
    pub order: Option<usize>,
}

fn get_check_app<'a, 'b>(app_name: &'a str, version: &'a str) -> App<'a, 'b>
where
    'a: 'b,
{
    App::new(app_name)
        .version(version)
        .about("Checks a generated test suite against its model.")
        .arg(
            Arg::with_name(MODEL_FILE_ARG)
                .required(true)
                .help("Set the model file with the definition of the system."),
        )
        .arg(
            Arg::with_name(RESULT_FILE_ARG)
                .required(true)
                .help("Set the file with the generated suite."),
        )
        .arg(
            Arg::with_name(ORDER_ARG)
                .short("o")
                .long("order")
                .takes_value(true)
                .help("Set the order to check, or 'max' for the highest possible order. Defaults to 2."),
        )
}

fn validate_order(matches: &ArgMatches) -> Result<Option<usize>, String> {
    let order = match matches.value_of(ORDER_ARG) {
        Some(text) if text.trim().eq_ignore_ascii_case(MAX_ORDER_TEXT) => None,
        _ => Some(parse_number(matches, ORDER_ARG)?.unwrap_or(DEFAULT_ORDER)),
    };
    match order {
        Some(order) if order < MIN_ORDER => Err(format!("Please provide an order of at least {}.", MIN_ORDER)),
        _ => Ok(order),
    }
}

fn validate_check_args(matches: ArgMatches) -> Result<CheckArguments, String> {
    Ok(CheckArguments {
        model_file: PathBuf::from(matches.value_of(MODEL_FILE_ARG).ok_or("The model file should be provided")?),
        result_file: PathBuf::from(matches.value_of(RESULT_FILE_ARG).ok_or("The result file should be provided")?),
        order: validate_order(&matches)?,
    })
}

fn get_matches<'a, 'b, I, T>(app: App<'a, 'b>, args: I) -> Result<ArgMatches<'a>, String>
where
    'a: 'b,
    I: IntoIterator<Item=T>,
    T: Into<OsString> + Clone,
{
    app.get_matches_from_safe(args).map_err(|e| match e.kind {
        clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => e.exit(),
        _ => e.message,
    })
}

/// Parse the given command line of the checker.
pub fn parse_check_arguments_from<I, T>(app_name: &str, version: &str, args: I) -> Result<CheckArguments, String>
where
    I: IntoIterator<Item=T>,
    T: Into<OsString> + Clone,
{
    validate_check_args(get_matches(get_check_app(app_name, version), args)?)
}

#[cfg(test)]
mod test_lib;
