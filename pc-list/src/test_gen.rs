// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use super::*;

#[test]
fn test_generate_pc_list_2_4() {
    let result = PCList::uniform(4, 2);
    assert_eq!(calculate_length(2, 4), 6);
    assert_eq!(result.len(), 6);

    let mut pcs = result.pcs.clone();
    pcs.sort();
    assert_eq!(pcs, vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]);
}

#[test]
fn test_generate_pc_list_3_5() {
    let result = PCList::uniform(5, 3);
    assert_eq!(calculate_length(3, 5), 10);
    assert_eq!(result.len(), 10);
    assert!(result.pcs.iter().all(|pc| pc.len() == 3 && pc.windows(2).all(|w| w[0] < w[1])));
}

#[test]
fn test_generate_pc_list_full() {
    let result = PCList::uniform(4, 4);
    assert_eq!(result.pcs, vec![vec![0, 1, 2, 3]]);
}

#[test]
fn test_generate_pc_list_order_one() {
    let result = PCList::uniform(3, 1);
    let mut pcs = result.pcs.clone();
    pcs.sort();
    assert_eq!(pcs, vec![vec![0], vec![1], vec![2]]);
}

#[test]
fn test_generate_pc_list_mixed() {
    // three parameters of order 3 and one of order 2
    let result = PCList::new(&[3, 3, 3, 2]);
    let mut pcs = result.pcs.clone();
    pcs.sort();
    assert_eq!(pcs, vec![vec![0, 1, 2], vec![0, 3], vec![1, 3], vec![2, 3]]);
}

#[test]
fn test_generate_pc_list_mixed_with_result() {
    // pairwise parameters plus an order one parameter at the end
    let result = PCList::new(&[2, 2, 2, 1]);
    let mut pcs = result.pcs.clone();
    pcs.sort();
    assert_eq!(pcs, vec![vec![0, 1], vec![0, 2], vec![1, 2], vec![3]]);
}

#[test]
fn test_generate_pc_list_empty() {
    assert!(PCList::new(&[]).is_empty());
}

#[test]
fn test_calculate_length() {
    assert_eq!(calculate_length(6, 7), 7);
    assert_eq!(calculate_length(1, 5), 5);
    assert_eq!(calculate_length(0, 5), 1);
    assert_eq!(calculate_length(6, 5), 0);
}
