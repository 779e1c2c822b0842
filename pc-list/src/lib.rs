// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This module contains the [PCList] struct.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

#[cfg(test)]
mod test_gen;

/// This struct contains all the PCs (Parameter Combinations) that have to be covered jointly.
///
/// Parameters are referred to by their position in the order list given to [PCList::new].
/// That list has to be sorted on descending order, and every PC contains at least one parameter
/// whose order equals the size of the PC. Groupings that are a subset of a larger PC are not repeated.
#[derive(Clone, Debug, Default)]
pub struct PCList {
    /// These are the actual PCs provided by this struct, each sorted ascending.
    ///
    /// Should not change after [PCList::new] creates it.
    pub pcs: Vec<Vec<usize>>,
}

impl PCList {
    /// Create a new [PCList] struct for parameters with the given orders.
    ///
    /// The orders have to be sorted descending and be at least one.
    pub fn new(orders: &[usize]) -> Self {
        debug_assert!(orders.windows(2).all(|w| w[0] >= w[1]), "orders must be sorted descending");
        let mut result = Self::default();
        let mut current = Vec::new();

        let mut end = 0;
        while end < orders.len() {
            let order = orders[end];
            while end < orders.len() && orders[end] == order {
                end += 1;
            }
            result.choose(orders, end, order, order, &mut current);
        }
        result
    }

    /// Create a [PCList] where every one of the given number of parameters has the same order.
    pub fn uniform(parameter_count: usize, order: usize) -> Self {
        Self::new(&vec![order; parameter_count])
    }

    fn choose(&mut self, orders: &[usize], mut last: usize, order: usize, real_order: usize, current: &mut Vec<usize>) {
        if order == 0 {
            self.pcs.push(current.iter().rev().copied().collect());
            return;
        }

        while last >= order {
            last -= 1;
            // the first pick has to be one of the parameters of exactly this order
            if orders[last] != order && order == real_order {
                break;
            }
            current.push(last);
            self.choose(orders, last, order - 1, real_order, current);
            current.pop();
        }
    }

    /// The number of PCs.
    pub fn len(&self) -> usize {
        self.pcs.len()
    }

    /// Whether there are no PCs.
    pub fn is_empty(&self) -> bool {
        self.pcs.is_empty()
    }
}

/// Calculate the number of PCs of the given size that can be made of the given number of parameters.
#[inline]
pub fn calculate_length(mut size: usize, parameters: usize) -> usize {
    if size > parameters {
        return 0;
    }
    if size > parameters - size {
        size = parameters - size;
    }

    let mut res: usize = 1;
    for i in 0..size {
        res *= parameters - i;
        res /= i + 1;
    }
    res
}
