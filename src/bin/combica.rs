// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate contains the binary generating a test suite for the model file given on the command line.

use std::process::exit;

use combica::cli::{crate_version, parse_arguments};
use combica::{init_logging, run};

/// Generate the suite for the given command line arguments.
fn main() {
    let arguments = match parse_arguments("combica", crate_version!()) {
        Ok(arguments) => arguments,
        Err(message) => {
            eprintln!("{}", message);
            exit(1);
        }
    };
    init_logging(arguments.verbose);

    let stdout = std::io::stdout();
    if let Err(error) = run(&arguments, stdout.lock()) {
        eprintln!("{}", error);
        exit(error.exit_code());
    }
}
