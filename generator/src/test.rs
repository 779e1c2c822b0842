// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::collections::HashSet;

use itertools::iproduct;
use proptest::prelude::*;

use common::{GenerationMode, GenerationType, ModelId, ParameterId, Term, UNDEFINED_VALUE};
use mca::verify::{exclusion_violations, uncovered_interactions};
use mca::MCA;

use crate::Task;

fn flat_task(value_counts: &[usize], seed: u64) -> (Task, ModelId, Vec<ParameterId>) {
    let mut task = Task::new();
    let model = task.create_model(seed);
    let parameters = value_counts.iter().map(|&count| task.add_parameter(model, count, None, None).unwrap()).collect();
    (task, model, parameters)
}

fn all_rows(task: &mut Task) -> Vec<Vec<usize>> {
    let mut rows = Vec::new();
    let mut buffer = vec![0; task.total_parameter_count()];
    while task.next_result_row(&mut buffer) > 0 {
        rows.push(buffer.clone());
    }
    rows
}

fn check_rows(task: &Task, order: usize, exclusions: &[&[Term]]) {
    let results = task.results().unwrap();
    let columns: Vec<(usize, usize)> = results.columns.iter()
        .enumerate()
        .map(|(column, &parameter)| (column, task.sut().parameter(parameter).value_count()))
        .collect();
    let violations = exclusion_violations(results, exclusions.iter().copied());
    assert!(violations.is_empty(), "violations: {:?}", violations);
    let uncovered = uncovered_interactions(results, &columns, order, exclusions);
    assert!(uncovered.is_empty(), "uncovered: {:?}", uncovered);
}

#[test]
fn test_three_by_three() {
    let (mut task, _, _) = flat_task(&[3, 3, 3], 0);
    task.generate().unwrap();
    let results = task.results().unwrap();
    assert!((9..=12).contains(&results.len()), "{} rows", results.len());
    assert_eq!(0, results.remaining_combinations);
    assert_eq!(27, results.total_combinations);
    check_rows(&task, 2, &[]);
}

#[test]
fn test_seeded_scenario() {
    let mut task = Task::new();
    let model = task.create_model(0);
    let p1 = task.add_parameter(model, 4, None, Some(&[1, 2, 1, 1])).unwrap();
    let p2 = task.add_parameter(model, 3, None, None).unwrap();
    let p3 = task.add_parameter(model, 5, None, None).unwrap();
    let p4 = task.add_parameter(model, 2, None, None).unwrap();
    let p5 = task.add_parameter(model, 4, None, None).unwrap();
    let first = [Term::new(p1, 0), Term::new(p2, 0)];
    let second = [Term::new(p4, 1), Term::new(p5, 2)];
    task.add_exclusion(&first).unwrap();
    task.add_exclusion(&second).unwrap();
    task.add_seed(&[Term::new(p1, 1), Term::new(p2, 1), Term::new(p3, 1), Term::new(p4, 1), Term::new(p5, 1)]).unwrap();
    task.generate().unwrap();

    check_rows(&task, 2, &[&first, &second]);
    let rows = all_rows(&mut task);
    assert_eq!(vec![1; 5], rows[0]);
    assert_eq!(1, rows.iter().filter(|row| row.iter().all(|&value| value == 1)).count());
    assert!(rows.len() >= 20, "at least the 20 pairs of P3 and P5: {}", rows.len());
}

#[test]
fn test_deterministic() {
    let generate = |seed| {
        let (mut task, _, parameters) = flat_task(&[3, 4, 2, 3, 2], seed);
        task.add_exclusion(&[Term::new(parameters[0], 1), Term::new(parameters[1], 2)]).unwrap();
        task.generate().unwrap();
        task.results().unwrap().rows.clone()
    };
    assert_eq!(generate(5), generate(5));
    assert_eq!(generate(0), generate(0));
}

#[test]
fn test_refetch() {
    let (mut task, _, _) = flat_task(&[2, 3, 2], 3);
    task.generate().unwrap();
    let first = all_rows(&mut task);
    assert!(all_rows(&mut task).is_empty());
    task.reset_result_fetching();
    assert_eq!(first, all_rows(&mut task));

    task.generate().unwrap();
    assert_eq!(first, all_rows(&mut task));
}

#[test]
fn test_derived_exclusion_is_respected() {
    let (mut task, _, p) = flat_task(&[2, 2, 2], 1);
    let first = [Term::new(p[0], 0), Term::new(p[1], 0)];
    let second = [Term::new(p[0], 1), Term::new(p[2], 0)];
    let derived = [Term::new(p[1], 0), Term::new(p[2], 0)];
    task.add_exclusion(&first).unwrap();
    task.add_exclusion(&second).unwrap();
    task.generate().unwrap();
    check_rows(&task, 2, &[&first, &second, &derived]);
}

#[test]
fn test_mixed_order() {
    let mut task = Task::new();
    let model = task.create_model(2);
    for _ in 0..3 {
        task.add_parameter(model, 2, Some(3), None).unwrap();
    }
    task.add_parameter(model, 3, None, None).unwrap();
    task.generate().unwrap();
    check_rows(&task, 2, &[]);

    let results = task.results().unwrap();
    assert!(results.len() >= 8);
    assert!(uncovered_interactions(results, &[(0, 2), (1, 2), (2, 2)], 3, &[]).is_empty());
}

#[test]
fn test_shared_parameter_between_submodels() {
    let mut task = Task::new();
    let root = task.create_model(4);
    let left = task.create_model(4);
    let right = task.create_model(4);
    task.attach_child(root, left, 2).unwrap();
    task.attach_child(root, right, 2).unwrap();
    let a = task.add_parameter(left, 3, None, None).unwrap();
    task.add_parameter(left, 2, None, None).unwrap();
    let c = task.add_parameter(left, 3, None, None).unwrap();
    task.sut_mut().share_parameter(right, c).unwrap();
    let d = task.add_parameter(right, 2, None, None).unwrap();
    let exclusion = [Term::new(a, 0), Term::new(d, 1)];
    task.add_exclusion(&exclusion).unwrap();
    task.generate().unwrap();

    let sut = task.sut();
    let results = sut.model(root).results();
    assert_eq!(4, results.columns.len());
    for child in [left, right] {
        let child_rows: HashSet<&Vec<usize>> = sut.model(child).results().rows.iter().collect();
        let columns: Vec<usize> = sut.model(child).results().columns.iter()
            .map(|&parameter| results.column_of(parameter).unwrap())
            .collect();
        for row in &results.rows {
            let projected: Vec<usize> = columns.iter().map(|&column| row[column]).collect();
            assert!(child_rows.contains(&projected), "{:?} is no row of {}", projected, child);
        }
    }
    assert!(exclusion_violations(results, [&exclusion[..]]).is_empty());
}

#[test]
fn test_preview() {
    let (mut task, _, p) = flat_task(&[3, 3, 2, 2], 9);
    let exclusion = [Term::new(p[0], 2), Term::new(p[2], 1)];
    task.add_exclusion(&exclusion).unwrap();
    task.set_generation_mode(GenerationMode::Preview);
    task.generate().unwrap();
    let results = task.results().unwrap();
    assert!(!results.is_empty());
    assert!(exclusion_violations(results, [&exclusion[..]]).is_empty());
}

#[test]
fn test_approximate() {
    let (mut task, _, p) = flat_task(&[2, 3, 2], 6);
    let exclusion = [Term::new(p[0], 0), Term::new(p[1], 0)];
    task.add_exclusion(&exclusion).unwrap();
    task.set_generation_mode(GenerationMode::Approximate);
    task.set_max_random_tries(50);
    task.generate().unwrap();
    let results = task.results().unwrap();
    assert!(exclusion_violations(results, [&exclusion[..]]).is_empty());
    assert_eq!(0, results.remaining_combinations);
    check_rows(&task, 2, &[&exclusion]);
}

#[test]
fn test_approximate_stops_when_out_of_tries() {
    for seed in 0..10 {
        let (mut task, _, p) = flat_task(&[4, 4], seed);
        let mut exclusions = Vec::new();
        for (a, b) in iproduct!(0..4, 0..4).filter(|(a, b)| a != b) {
            let exclusion = [Term::new(p[0], a), Term::new(p[1], b)];
            task.add_exclusion(&exclusion).unwrap();
            exclusions.push(exclusion);
        }
        task.set_generation_mode(GenerationMode::Approximate);
        task.set_max_random_tries(1);
        task.generate().unwrap();

        let results = task.results().unwrap();
        assert!(results.remaining_combinations > 0, "seed {}: {:?}", seed, results.rows);
        assert!(results.rows.iter().all(|row| row[0] == row[1]), "seed {}: {:?}", seed, results.rows);
        assert!(exclusion_violations(results, exclusions.iter().map(|exclusion| &exclusion[..])).is_empty());
    }
}

#[test]
fn test_seed_inside_excluded_seed_is_kept() {
    for seed in 0..10 {
        let (mut task, _, p) = flat_task(&[3, 3, 3, 3], seed);
        task.add_exclusion(&[Term::new(p[1], 0), Term::new(p[3], 2)]).unwrap();
        task.add_seed(&[Term::new(p[0], 2), Term::new(p[1], 0), Term::new(p[2], 2), Term::new(p[3], 2)]).unwrap();
        task.add_seed(&[Term::new(p[0], 2), Term::new(p[1], 0), Term::new(p[2], 2)]).unwrap();
        task.generate().unwrap();

        let first = &task.results().unwrap().rows[0];
        assert_eq!((2, 0, 2), (first[0], first[1], first[2]), "seed {}", seed);
        assert_ne!(2, first[3], "seed {}", seed);
    }
}

#[test]
fn test_approximate_keeps_seed() {
    let (mut task, _, p) = flat_task(&[2, 2, 2], 6);
    task.add_seed(&[Term::new(p[1], 1)]).unwrap();
    task.set_generation_mode(GenerationMode::Approximate);
    task.generate().unwrap();
    assert_eq!(1, task.results().unwrap().rows[0][1]);
}

#[test]
fn test_full() {
    let (mut task, model, _) = flat_task(&[2, 3, 2], 0);
    task.sut_mut().set_generation(model, GenerationType::Full, None);
    task.generate().unwrap();
    let rows: HashSet<Vec<usize>> = task.results().unwrap().rows.iter().cloned().collect();
    let expected: HashSet<Vec<usize>> = iproduct!(0..2, 0..3, 0..2).map(|(a, b, c)| vec![a, b, c]).collect();
    assert_eq!(12, task.results().unwrap().len());
    assert_eq!(expected, rows);
}

#[test]
fn test_flat() {
    let (mut task, model, _) = flat_task(&[3, 2, 4], 0);
    task.sut_mut().set_generation(model, GenerationType::Flat, None);
    task.generate().unwrap();
    let results = task.results().unwrap();
    assert_eq!(4, results.len());
    assert_eq!(vec![0, 0, 0], results.rows[0]);
    assert_eq!(vec![1, 1, 1], results.rows[1]);
    assert_eq!(2, results.rows[2][0]);
    assert_eq!(3, results.rows[3][2]);

    task.sut_mut().set_generation(model, GenerationType::Flat, Some(2));
    task.generate().unwrap();
    assert_eq!(2, task.results().unwrap().len());
}

#[test]
fn test_random_is_trimmed() {
    let (mut task, model, _) = flat_task(&[5, 5], 8);
    task.sut_mut().set_generation(model, GenerationType::Random, Some(3));
    task.generate().unwrap();
    assert_eq!(3, task.results().unwrap().len());
}

#[test]
fn test_expected_results() {
    let definition = sut::parse_definition("
        a: x, y, z;
        $r: pass, fail;
        $exclude a = x && r = fail;
    ").unwrap();
    let mut task = Task::from_definition(definition);
    task.generate().unwrap();
    let results = task.results().unwrap();
    assert!(!results.is_empty());
    for row in &results.rows {
        match row[0] {
            0 => assert_eq!(0, row[1]),
            _ => assert_eq!(UNDEFINED_VALUE, row[1]),
        }
    }
}

#[test]
fn test_empty_model() {
    let mut task = Task::new();
    task.create_model(0);
    task.generate().unwrap();
    assert_eq!(&MCA::default(), task.results().unwrap());
    assert_eq!(0, task.next_result_row(&mut []));
}

#[test]
fn test_contradicting_exclusions_fail() {
    let (mut task, _, p) = flat_task(&[2, 2], 0);
    task.add_exclusion(&[Term::new(p[0], 0)]).unwrap();
    task.add_exclusion(&[Term::new(p[0], 1)]).unwrap();
    assert!(task.generate().is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_pairwise_coverage(counts in prop::collection::vec(1usize..4, 2..6), seed in any::<u64>()) {
        let (mut task, _, _) = flat_task(&counts, seed);
        task.generate().unwrap();
        let first = task.results().unwrap().rows.clone();
        check_rows(&task, 2, &[]);

        task.generate().unwrap();
        prop_assert_eq!(first, task.results().unwrap().rows.clone());
    }
}
