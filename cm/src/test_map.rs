// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use proptest::prelude::*;

use crate::*;

struct Row(Vec<Option<usize>>);

impl Bindings for Row {
    fn value(&self, parameter: usize) -> Option<usize> {
        self.0[parameter]
    }
}

fn bind(combination: &mut Combination, row: &mut Row, open: &mut OpenCells, parameter: usize, value: usize) -> usize {
    row.0[parameter] = Some(value);
    combination.add_binding(row, open)
}

#[test]
fn test_new_counts_open_cells() {
    let mut open = OpenCells::new();
    let a = Combination::new(0, &[(0, 3), (1, 2)], Cell::Open, &mut open).unwrap();
    assert_eq!(6, a.range());
    assert_eq!(6, a.open_count());
    let b = Combination::new(1, &[(0, 3), (2, 4)], Cell::Covered, &mut open).unwrap();
    assert_eq!(12, b.range());
    assert_eq!(0, b.open_count());
    assert_eq!(6, open.count());
}

#[test]
fn test_mixed_radix_addressing() {
    let mut open = OpenCells::new();
    let combination = Combination::new(0, &[(4, 3), (1, 2), (0, 4)], Cell::Open, &mut open).unwrap();
    // the first member is the most significant digit
    assert_eq!(0, combination.index_of(&[0, 0, 0]));
    assert_eq!(1, combination.index_of(&[0, 0, 1]));
    assert_eq!(4, combination.index_of(&[0, 1, 0]));
    assert_eq!(8, combination.index_of(&[1, 0, 0]));
    assert_eq!(23, combination.index_of(&[2, 1, 3]));
    assert_eq!(vec![(0, 3), (1, 1), (4, 2)], combination.decode(23));
}

#[test]
fn test_add_binding_covers_cell() {
    let mut open = OpenCells::new();
    let mut combination = Combination::new(0, &[(0, 2), (1, 2)], Cell::Open, &mut open).unwrap();
    let mut row = Row(vec![None, None]);

    assert_eq!(1, bind(&mut combination, &mut row, &mut open, 1, 1));
    assert_eq!(4, open.count());
    assert_eq!(2, bind(&mut combination, &mut row, &mut open, 0, 0));
    assert!(combination.is_fully_bound());
    assert_eq!(3, open.count());
    assert_eq!(Cell::Covered, combination.cell(combination.index_of(&[0, 1])));

    // covering the same cell again does not change the counters
    combination.reset_bindings();
    bind(&mut combination, &mut row, &mut open, 0, 0);
    bind(&mut combination, &mut row, &mut open, 1, 1);
    assert_eq!(3, open.count());
    assert_eq!(3, combination.open_count());
}

#[test]
fn test_feasible_at() {
    let mut open = OpenCells::new();
    let mut combination = Combination::new(0, &[(0, 2), (1, 3)], Cell::Open, &mut open).unwrap();
    let mut row = Row(vec![Some(1), Some(2)]);
    combination.add_binding(&row, &mut open);
    combination.add_binding(&row, &mut open);
    combination.reset_bindings();

    row.0 = vec![Some(1), None];
    assert_eq!(Feasibility::CoveredMatch, combination.feasible_at(combination.index_of(&[1, 2]), &row));
    assert_eq!(Feasibility::Open, combination.feasible_at(combination.index_of(&[1, 0]), &row));
    assert_eq!(Feasibility::Excluded, combination.feasible_at(combination.index_of(&[0, 0]), &row));

    combination.apply_exclusion(&[(0, 1), (1, 1)], &mut open);
    assert_eq!(Feasibility::Excluded, combination.feasible_at(combination.index_of(&[1, 1]), &row));
}

#[test]
fn test_feasible_counts_reachable_open_cells() {
    let mut open = OpenCells::new();
    let mut combination = Combination::new(0, &[(0, 2), (1, 3), (2, 2)], Cell::Open, &mut open).unwrap();
    let mut row = Row(vec![None, None, None]);
    let mut scratch = Vec::new();

    assert_eq!(12, combination.feasible(&row, &mut scratch));
    row.0[1] = Some(2);
    assert_eq!(4, combination.feasible(&row, &mut scratch));
    row.0[0] = Some(0);
    assert_eq!(2, combination.feasible(&row, &mut scratch));

    combination.apply_exclusion(&[(0, 0), (2, 1)], &mut open);
    assert_eq!(1, combination.feasible(&row, &mut scratch));
}

#[test]
fn test_apply_exclusion() {
    let mut open = OpenCells::new();
    let mut combination = Combination::new(0, &[(0, 2), (1, 3), (2, 2)], Cell::Open, &mut open).unwrap();

    // not all parameters of the exclusion are members
    combination.apply_exclusion(&[(0, 0), (3, 1)], &mut open);
    assert_eq!(12, open.count());

    combination.apply_exclusion(&[(0, 0), (2, 1)], &mut open);
    assert_eq!(9, open.count());
    assert_eq!(9, combination.open_count());
    for value in 0..3 {
        assert_eq!(Cell::Excluded, combination.cell(combination.index_of(&[0, value, 1])));
        assert_eq!(Cell::Open, combination.cell(combination.index_of(&[1, value, 1])));
    }

    // overlapping exclusions only count open cells once
    combination.apply_exclusion(&[(0, 0)], &mut open);
    assert_eq!(6, open.count());
}

#[test]
fn test_violates_exclusion() {
    let mut open = OpenCells::new();
    let mut combination = Combination::new(0, &[(0, 2), (1, 2)], Cell::Open, &mut open).unwrap();
    combination.apply_exclusion(&[(0, 1), (1, 0)], &mut open);

    assert!(combination.violates_exclusion(&Row(vec![Some(1), Some(0)])));
    assert!(!combination.violates_exclusion(&Row(vec![Some(1), Some(1)])));
}

#[test]
fn test_covered_fill_has_no_open_cells() {
    let mut open = OpenCells::new();
    let mut combination = Combination::new(3, &[(0, 2), (1, 2)], Cell::Covered, &mut open).unwrap();
    combination.apply_exclusion(&[(0, 1)], &mut open);
    assert!(open.is_covered());
    assert_eq!(3, combination.id());
}

#[test]
fn test_index_or_zero_and_weight() {
    let mut open = OpenCells::new();
    let combination = Combination::new(0, &[(0, 3), (1, 4)], Cell::Open, &mut open).unwrap();
    let row = Row(vec![None, Some(2)]);
    assert_eq!(combination.index_of(&[0, 2]), combination.index_or_zero(&row));

    let weights = [vec![1, 5, 1], vec![2, 2, 2, 7]];
    let index = combination.index_of(&[1, 3]);
    assert_eq!(12, combination.weight(index, |p, v| weights[p][v]));
}

proptest! {
    #[test]
    fn prop_decode_inverts_index_of(a in 1usize..5, b in 1usize..5, c in 1usize..5, seed in 0usize..1000) {
        let mut open = OpenCells::new();
        let combination = Combination::new(0, &[(0, a), (1, b), (2, c)], Cell::Open, &mut open).unwrap();
        let index = seed % combination.range();
        let mut values = vec![0; 3];
        for (parameter, value) in combination.decode(index) {
            values[parameter] = value;
        }
        prop_assert_eq!(index, combination.index_of(&values));
    }

    #[test]
    fn prop_exclusion_keeps_counters_in_sync(a in 1usize..4, b in 1usize..4, va in 0usize..4, vb in 0usize..4) {
        let mut open = OpenCells::new();
        let mut first = Combination::new(0, &[(0, a), (1, b)], Cell::Open, &mut open).unwrap();
        let mut second = Combination::new(1, &[(1, b), (2, 2)], Cell::Open, &mut open).unwrap();
        first.apply_exclusion(&[(0, va % a), (1, vb % b)], &mut open);
        second.apply_exclusion(&[(1, vb % b)], &mut open);
        prop_assert_eq!(open.count(), first.open_count() + second.open_count());
        prop_assert_eq!(a * b - 1, first.open_count());
    }
}
