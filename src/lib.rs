// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! Combica generates combinatorial test suites: every combination of values of the configured order appears in at
//! least one row, no row contains an excluded combination, and the suite stays small.
//!
//! The crates included provide the parts:
//!   * [sut] The model: parameters, sub-models, exclusions and seeds, and their file formats.
//!   * [generator] The generation of the rows, driven through [generator::Task].
//!   * [mca] The generated rows and their verification.
//!   * [writer] The tab-separated output.
//!   * [cli] The command line.
//!
//! # Features
//! This crate provides the following optional features:
//!   * `sub-time` Log the timings for all the [common::sub_time_it] calls.
//!
//! # Example
//! ```
//! let definition = combica::sut::parse_definition("
//!     Type:  Primary, Logical, Single;
//!     Size:  10, 100, 500;
//!     Format: quick, slow;
//!     $exclude Type = Single && Size = 500;
//! ").unwrap();
//! let mut task = combica::generator::Task::from_definition(definition);
//! task.generate().unwrap();
//!
//! let mut output = Vec::new();
//! combica::write_rows(&task, &mut output).unwrap();
//! assert!(String::from_utf8(output).unwrap().starts_with("Type\tSize\tFormat\n"));
//! ```

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::io::Write;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use cli;
pub use cm;
pub use common;
pub use generator;
pub use mca;
pub use pc_list;
pub use sut;
pub use writer;

use cli::Arguments;
use common::{time_it, GenerationError};
use generator::Task;
use mca::MCA;

/// Everything that can stop a run of the command line.
#[derive(Debug, Error)]
pub enum RunError {
    /// Bad arguments, or a model or seed file that could not be read.
    #[error("{0}")]
    Definition(String),

    /// The generation itself failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The suite could not be written.
    #[error("could not write the result: {0}")]
    Output(#[from] std::io::Error),
}

impl RunError {
    /// The exit code of the process: 1 for definition and output errors, 2 for generation errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Generation(_) => 2,
            RunError::Definition(_) | RunError::Output(_) => 1,
        }
    }
}

/// Log to standard error: warnings, or debug messages when `verbose`. `RUST_LOG` overrides both.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    // A subscriber installed earlier, by a test for example, stays in place.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn results(task: &Task) -> Result<&MCA, RunError> {
    task.results().ok_or_else(|| GenerationError::Failure("no root model was set".to_string()).into())
}

/// Load the model named by the arguments and generate its rows.
pub fn generate(arguments: &Arguments) -> Result<Task, RunError> {
    let definition = time_it!(cli::load_definition(arguments), "Parsing").map_err(RunError::Definition)?;
    let mut task = Task::from_definition(definition);
    task.set_generation_mode(arguments.mode);
    task.set_max_random_tries(arguments.max_random_tries);
    task.generate()?;
    Ok(task)
}

/// Write the rows of the root model as tab-separated text.
pub fn write_rows<W: Write>(task: &Task, output: W) -> Result<(), RunError> {
    writer::write_result(task.sut(), results(task)?, output)?;
    Ok(())
}

/// Write the coverage statistics of the root model.
pub fn write_statistics<W: Write>(task: &Task, mut output: W) -> Result<(), RunError> {
    let results = results(task)?;
    writeln!(output, "Combinations:\t{}", results.total_combinations)?;
    writeln!(output, "Generated tests:\t{}", results.len())?;
    writeln!(output, "Uncovered combinations:\t{}", results.remaining_combinations)?;
    writeln!(output, "Coverage:\t{:.2}%", results.coverage() * 100.0)?;
    output.flush()?;
    Ok(())
}

/// Generate the suite for the given arguments and write it, or its statistics, to the output.
///
/// The output file of the arguments takes precedence over `output`.
pub fn run<W: Write>(arguments: &Arguments, output: W) -> Result<(), RunError> {
    let task = generate(arguments)?;
    if arguments.statistics {
        return write_statistics(&task, output);
    }
    match &arguments.output_file {
        Some(path) => time_it!(writer::write_result_file(task.sut(), results(&task)?, path), "Writing")?,
        None => write_rows(&task, output)?,
    }
    info!(rows = results(&task)?.len(), "Done");
    Ok(())
}
