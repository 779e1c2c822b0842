// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fs;

use common::{Id, ParameterId};

use super::*;

fn validate(args: &[&str]) -> Result<Arguments, String> {
    validate_args(get_matches(get_app("", ""), args)?)
}

#[test]
fn test_defaults() {
    let arguments = validate(&["exe", "model.txt"]).unwrap();
    assert_eq!(PathBuf::from("model.txt"), arguments.model_file);
    assert_eq!(Some(DEFAULT_ORDER), arguments.order);
    assert_eq!(GenerationMode::Regular, arguments.mode);
    assert_eq!(GenerationType::MixedOrder, arguments.generation);
    assert_eq!(DEFAULT_MAX_RANDOM_TRIES, arguments.max_random_tries);
    assert_eq!(0, arguments.random_seed);
    assert_eq!(None, arguments.output_file);
    assert!(!arguments.statistics && !arguments.verbose);
}

#[test]
fn test_validate_order() {
    assert_eq!(Some(3), validate(&["exe", "-o", "3", "model.txt"]).unwrap().order);
    assert_eq!(None, validate(&["exe", "-o", "max", "model.txt"]).unwrap().order);
    assert_eq!(None, validate(&["exe", "--order", "MAX", "model.txt"]).unwrap().order);
    assert!(validate(&["exe", "-o", "0", "model.txt"]).is_err());
    assert!(validate(&["exe", "-o", "a", "model.txt"]).is_err());
    assert!(validate(&["exe", "-o", " ", "model.txt"]).is_err());
    assert!(validate(&["exe", "-o", "-1", "model.txt"]).is_err());
}

#[test]
fn test_validate_numbers() {
    let arguments = validate(&["exe", "model.txt", "--tries", "5", "--max-rows", "7", "-r", "42"]).unwrap();
    assert_eq!(5, arguments.max_random_tries);
    assert_eq!(Some(7), arguments.max_rows);
    assert_eq!(42, arguments.random_seed);
    assert!(validate(&["exe", "model.txt", "--tries", "many"]).is_err());
    assert!(validate(&["exe", "model.txt", "-r", "1.5"]).is_err());
}

#[test]
fn test_modes_and_generation_types() {
    let arguments = validate(&["exe", "model.txt", "-m", "Preview", "-g", "full", "-s", "-v"]).unwrap();
    assert_eq!(GenerationMode::Preview, arguments.mode);
    assert_eq!(GenerationType::Full, arguments.generation);
    assert!(arguments.statistics && arguments.verbose);

    assert!(parse_arguments_from("", "", &["exe", "model.txt", "-m", "fast"]).is_err());
    assert!(parse_arguments_from("", "", &["exe", "model.txt", "-g", "pairs"]).is_err());
    assert!(parse_arguments_from("", "", &["exe"]).is_err());
}

#[test]
fn test_same_input_and_output() {
    assert!(validate(&["exe", "model.txt", "-O", "model.txt"]).is_err());
    assert_eq!(Some(PathBuf::from("out.txt")), validate(&["exe", "model.txt", "-O", "out.txt"]).unwrap().output_file);
}

#[test]
fn test_load_definition() {
    let directory = std::env::temp_dir().join(format!("combica-cli-{}", std::process::id()));
    fs::create_dir_all(&directory).unwrap();
    let model_file = directory.join("model.txt");
    let seed_file = directory.join("seeds.txt");
    fs::write(&model_file, "a: 1, 2, 3;\nb: x, y;\nc: x, y;\n").unwrap();
    fs::write(&seed_file, "a\tb\n2\ty\n").unwrap();

    let path = |file: &std::path::Path| file.to_str().unwrap().to_string();
    let arguments = validate(&["exe", &path(&model_file), "-o", "max", "-r", "9", "-e", &path(&seed_file), "-g", "random"])
        .unwrap();
    let definition = load_definition(&arguments).unwrap();
    let root = definition.sut.model(definition.root);
    assert_eq!(3, root.order());
    assert_eq!(9, root.seed());
    assert_eq!(GenerationType::Random, root.generation());
    assert_eq!(1, definition.seeds.len());
    assert_eq!(Some(1), definition.seeds[0].value_of(ParameterId::from_usize(0)));

    fs::remove_dir_all(&directory).unwrap();
    assert!(load_definition(&arguments).is_err());
}

#[test]
fn test_check_arguments() {
    let arguments = parse_check_arguments_from("", "", &["exe", "model.txt", "result.txt"]).unwrap();
    assert_eq!(PathBuf::from("result.txt"), arguments.result_file);
    assert_eq!(Some(DEFAULT_ORDER), arguments.order);
    assert_eq!(None, parse_check_arguments_from("", "", &["exe", "m", "r", "-o", "max"]).unwrap().order);
    assert!(parse_check_arguments_from("", "", &["exe", "m", "r", "-o", "0"]).is_err());
    assert!(parse_check_arguments_from("", "", &["exe", "model.txt"]).is_err());
}
