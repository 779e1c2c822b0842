// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The random source of a single model.
///
/// Every model owns one, seeded from the model seed, so a fixed seed and traversal order give identical rows.
#[derive(Clone, Debug)]
pub struct Random {
    rng: ChaCha8Rng,
}

impl Random {
    /// Create a new source from the given seed.
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// A uniformly drawn number in `0..bound`. Returns zero for an empty range.
    pub fn below(&mut self, bound: usize) -> usize {
        if bound <= 1 {
            0
        } else {
            self.rng.random_range(0..bound)
        }
    }

    /// Reservoir step: true with a probability of `1 / seen`.
    ///
    /// Calling this for the n-th equally good candidate keeps every candidate with the same probability.
    pub fn replace(&mut self, seen: usize) -> bool {
        self.below(seen) == 0
    }

    /// Weighted reservoir step: add `weight` to `total` and keep the candidate with probability `weight / total`.
    pub fn replace_weighted(&mut self, total: &mut u64, weight: u32) -> bool {
        *total += weight as u64;
        *total > 0 && self.rng.random_range(0..*total) < weight as u64
    }

    /// Pick an index from the given weights, proportional to the weight.
    ///
    /// Returns [None] if all weights are zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        if total == 0 {
            return None;
        }
        let mut target = self.rng.random_range(0..total);
        for (index, &weight) in weights.iter().enumerate() {
            if target < weight as u64 {
                return Some(index);
            }
            target -= weight as u64;
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deterministic() {
        let mut a = Random::new(7);
        let mut b = Random::new(7);
        let first: Vec<usize> = (0..32).map(|_| a.below(10)).collect();
        let second: Vec<usize> = (0..32).map(|_| b.below(10)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|&v| v < 10));
    }

    #[test]
    fn test_below_degenerate() {
        let mut random = Random::new(0);
        assert_eq!(0, random.below(0));
        assert_eq!(0, random.below(1));
        assert!(random.replace(1));
    }

    #[test]
    fn test_weighted_index() {
        let mut random = Random::new(3);
        assert_eq!(None, random.weighted_index(&[0, 0]));
        for _ in 0..50 {
            assert_eq!(Some(1), random.weighted_index(&[0, 4, 0]));
        }
    }

    #[test]
    fn test_replace_weighted_skips_zero() {
        let mut random = Random::new(3);
        let mut total = 0;
        assert!(!random.replace_weighted(&mut total, 0));
        assert!(random.replace_weighted(&mut total, 2));
        assert_eq!(2, total);
    }
}
