// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use itertools::iproduct;

use common::{Id, ParameterId, Term, UNDEFINED_VALUE};

use crate::verify::{exclusion_violations, uncovered_interactions};
use crate::MCA;

fn p(id: usize) -> ParameterId {
    ParameterId::from_usize(id)
}

fn exhaustive(a: usize, b: usize, c: usize) -> MCA {
    let rows = iproduct!(0..a, 0..b, 0..c).map(|(x, y, z)| vec![x, y, z]).collect();
    MCA::new(vec![p(0), p(1), p(2)], rows)
}

#[test]
fn test_cursor() {
    let mut mca = MCA::new(vec![p(0), p(1)], vec![vec![0, 1], vec![1, 0]]);
    let mut buffer = [9; 2];

    assert_eq!(2, mca.copy_next_row(&mut buffer));
    assert_eq!([0, 1], buffer);
    assert_eq!(1, mca.copy_next_row(&mut buffer));
    assert_eq!([1, 0], buffer);
    assert_eq!(0, mca.copy_next_row(&mut buffer));
    assert_eq!(0, mca.copy_next_row(&mut buffer));
    assert_eq!([1, 0], buffer);

    mca.reset();
    assert_eq!(Some(&[0, 1][..]), mca.next_row());
}

#[test]
fn test_refetch_is_identical() {
    let mut mca = exhaustive(2, 3, 2);
    let mut first = Vec::new();
    while let Some(row) = mca.next_row() {
        first.push(row.to_vec());
    }
    assert!(mca.next_row().is_none());
    mca.reset();
    let mut second = Vec::new();
    while let Some(row) = mca.next_row() {
        second.push(row.to_vec());
    }
    assert_eq!(first, second);
    assert_eq!(12, first.len());
}

#[test]
fn test_value_lookup() {
    let mca = MCA::new(vec![p(3), p(1)], vec![vec![2, UNDEFINED_VALUE]]);
    assert_eq!(Some(0), mca.column_of(p(3)));
    assert_eq!(Some(2), mca.value(0, p(3)));
    assert_eq!(None, mca.value(0, p(1)));
    assert_eq!(None, mca.value(0, p(0)));
    assert_eq!(vec![None, Some(1), None, Some(0)], mca.column_lookup());
}

#[test]
fn test_coverage_ratio() {
    let mut mca = MCA::default();
    assert_eq!(1.0, mca.coverage());
    mca.total_combinations = 4;
    mca.remaining_combinations = 1;
    assert_eq!(0.75, mca.coverage());
}

#[test]
fn test_exclusion_violations() {
    let mca = exhaustive(2, 2, 2);
    let exclusion = [Term::new(p(0), 1), Term::new(p(2), 0)];
    let foreign = [Term::new(p(7), 0)];
    let violations = exclusion_violations(&mca, vec![&exclusion[..], &foreign[..]]);
    assert_eq!(2, violations.len());
    assert!(violations.iter().all(|(row, _)| mca.rows[*row][0] == 1 && mca.rows[*row][2] == 0));
}

#[test]
fn test_exhaustive_covers_everything() {
    let mca = exhaustive(3, 2, 2);
    let columns = [(0, 3), (1, 2), (2, 2)];
    assert!(uncovered_interactions(&mca, &columns, 2, &[]).is_empty());
    assert!(uncovered_interactions(&mca, &columns, 3, &[]).is_empty());
}

#[test]
fn test_uncovered_interactions() {
    let mut mca = exhaustive(2, 2, 2);
    mca.rows.retain(|row| !(row[0] == 0 && row[1] == 1));
    let columns = [(0, 2), (1, 2), (2, 2)];

    let uncovered = uncovered_interactions(&mca, &columns, 2, &[]);
    assert_eq!(vec![vec![Term::new(p(0), 0), Term::new(p(1), 1)]], uncovered);

    let exclusion = [Term::new(p(0), 0), Term::new(p(1), 1)];
    assert!(uncovered_interactions(&mca, &columns, 2, &[&exclusion[..]]).is_empty());
}
