// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This module provides the [Combination], the coverage map of one group of parameters that has to be covered jointly.
//!
//! Every cell of the map is one assignment of values to the members of the combination.
//! Cells are addressed mixed-radix: the first member is the most significant digit.
//! The number of [Cell::Open] cells of all combinations of a model is kept in the [OpenCells] counter,
//! which can only be changed through the methods of [Combination].

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use common::GenerationError;

#[cfg(test)]
mod test_map;

/// The state of one cell of the coverage map.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Must still appear in a row.
    Open = 0,
    /// Appeared in a row.
    Covered = 1,
    /// Must never appear in a row.
    Excluded = 0xff,
}

/// The result of checking a cell against the values that are currently bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Feasibility {
    /// The cell is open and agrees with the bound values.
    Open,
    /// The cell was covered before and agrees with the bound values.
    CoveredMatch,
    /// The cell is excluded or disagrees with a bound value.
    Excluded,
}

/// Read access to the values bound in the current row.
///
/// Parameters are referred to by their index in the model that owns the combinations.
pub trait Bindings {
    /// The value of the given parameter if it has been bound.
    fn value(&self, parameter: usize) -> Option<usize>;
}

/// The number of open cells over all the combinations of a model.
///
/// Generation of a model is finished when this reaches zero.
#[derive(Debug, Default)]
pub struct OpenCells {
    count: usize,
}

impl OpenCells {
    /// Create a new counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of open cells left.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether all cells are covered or excluded.
    pub fn is_covered(&self) -> bool {
        self.count == 0
    }

    fn increase(&mut self, by: usize) {
        self.count += by;
    }

    fn decrease(&mut self) {
        debug_assert!(self.count > 0);
        self.count -= 1;
    }
}

/// The coverage map of one group of parameters.
#[derive(Debug)]
pub struct Combination {
    id: usize,
    members: Vec<usize>,
    radices: Vec<usize>,
    map: Vec<Cell>,
    open_count: usize,
    bound_count: usize,
}

impl Combination {
    /// Create a new combination for the given `(parameter, value count)` members, with every cell set to `fill`.
    ///
    /// Open cells are added to the `open` counter.
    pub fn new(id: usize, members: &[(usize, usize)], fill: Cell, open: &mut OpenCells) -> Result<Self, GenerationError> {
        let mut range: usize = 1;
        for &(_, value_count) in members {
            range = range.checked_mul(value_count).ok_or(GenerationError::OutOfMemory)?;
        }

        let mut map = Vec::new();
        map.try_reserve_exact(range)?;
        map.resize(range, fill);

        let open_count = if fill == Cell::Open { range } else { 0 };
        open.increase(open_count);

        Ok(Self {
            id,
            members: members.iter().map(|&(parameter, _)| parameter).collect(),
            radices: members.iter().map(|&(_, value_count)| value_count).collect(),
            map,
            open_count,
            bound_count: 0,
        })
    }

    /// The stable id of this combination, used to order combinations deterministically.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The parameters in this combination, most significant first.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Whether the given parameter is a member.
    pub fn contains(&self, parameter: usize) -> bool {
        self.members.contains(&parameter)
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The number of cells in the map.
    pub fn range(&self) -> usize {
        self.map.len()
    }

    /// The state of the cell at the given index.
    pub fn cell(&self, index: usize) -> Cell {
        self.map[index]
    }

    /// The number of open cells of this combination.
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// The number of members bound in the current row.
    pub fn bound_count(&self) -> usize {
        self.bound_count
    }

    /// Whether every member is bound in the current row.
    pub fn is_fully_bound(&self) -> bool {
        self.bound_count == self.members.len()
    }

    /// Forget the bindings of the previous row.
    pub fn reset_bindings(&mut self) {
        self.bound_count = 0;
    }

    /// Classify the cell at the given index against the bound values.
    pub fn feasible_at<B: Bindings>(&self, mut index: usize, bindings: &B) -> Feasibility {
        let status = match self.map[index] {
            Cell::Excluded => return Feasibility::Excluded,
            Cell::Covered => Feasibility::CoveredMatch,
            Cell::Open => Feasibility::Open,
        };

        for (&member, &radix) in self.members.iter().zip(&self.radices).rev() {
            if let Some(value) = bindings.value(member) {
                if value != index % radix {
                    return Feasibility::Excluded;
                }
            }
            index /= radix;
        }
        status
    }

    /// The number of open cells that can still be reached given the bound values.
    ///
    /// `scratch` is reused between calls to avoid allocations.
    pub fn feasible<B: Bindings>(&self, bindings: &B, scratch: &mut Vec<usize>) -> usize {
        scratch.clear();
        scratch.push(0);

        for (&member, &radix) in self.members.iter().zip(&self.radices) {
            scratch.iter_mut().for_each(|index| *index *= radix);
            match bindings.value(member) {
                Some(value) => scratch.iter_mut().for_each(|index| *index += value),
                None => {
                    let reached = scratch.len();
                    for addend in 1..radix {
                        for at in 0..reached {
                            scratch.push(scratch[at] + addend);
                        }
                    }
                }
            }
        }

        scratch.iter().filter(|&&index| self.map[index] == Cell::Open).count()
    }

    /// Register that one more member has been bound.
    ///
    /// Once all members are bound the cell of the current row is covered.
    /// Returns the number of bound members.
    pub fn add_binding<B: Bindings>(&mut self, bindings: &B, open: &mut OpenCells) -> usize {
        debug_assert!(self.bound_count < self.members.len());
        self.bound_count += 1;
        if self.is_fully_bound() {
            let index = self.bound_index(bindings);
            if self.map[index] == Cell::Open {
                self.map[index] = Cell::Covered;
                self.open_count -= 1;
                open.decrease();
            }
        }
        self.bound_count
    }

    /// Whether the cell selected by the bound values is excluded.
    ///
    /// Only meaningful if all members are bound.
    pub fn violates_exclusion<B: Bindings>(&self, bindings: &B) -> bool {
        self.map[self.bound_index(bindings)] == Cell::Excluded
    }

    /// Mark every cell consistent with the given `(parameter, value)` terms as excluded.
    ///
    /// Does nothing unless every parameter of the terms is a member.
    pub fn apply_exclusion(&mut self, terms: &[(usize, usize)], open: &mut OpenCells) {
        if !terms.iter().all(|&(parameter, _)| self.contains(parameter)) {
            return;
        }
        self.exclude(terms, 0, 0, open);
    }

    fn exclude(&mut self, terms: &[(usize, usize)], position: usize, index: usize, open: &mut OpenCells) {
        if position == self.members.len() {
            if self.map[index] == Cell::Open {
                self.open_count -= 1;
                open.decrease();
            }
            self.map[index] = Cell::Excluded;
            return;
        }

        let member = self.members[position];
        let radix = self.radices[position];
        match terms.iter().find(|&&(parameter, _)| parameter == member) {
            Some(&(_, value)) => {
                debug_assert!(value < radix);
                self.exclude(terms, position + 1, index * radix + value, open);
            }
            None => {
                for value in 0..radix {
                    self.exclude(terms, position + 1, index * radix + value, open);
                }
            }
        }
    }

    /// The index of the cell for the given values, one per member in member order.
    pub fn index_of(&self, values: &[usize]) -> usize {
        debug_assert_eq!(values.len(), self.members.len());
        values.iter().zip(&self.radices).fold(0, |index, (&value, &radix)| index * radix + value)
    }

    /// Split the index of a cell into `(parameter, value)` pairs, least significant member first.
    pub fn decode(&self, mut index: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(self.members.len());
        for (&member, &radix) in self.members.iter().zip(&self.radices).rev() {
            result.push((member, index % radix));
            index /= radix;
        }
        result
    }

    /// The index agreeing with the bound values, using value zero for every unbound member.
    pub fn index_or_zero<B: Bindings>(&self, bindings: &B) -> usize {
        self.members
            .iter()
            .zip(&self.radices)
            .fold(0, |index, (&member, &radix)| index * radix + bindings.value(member).unwrap_or(0))
    }

    /// The summed weight of the values of a cell.
    pub fn weight<F: Fn(usize, usize) -> u32>(&self, index: usize, weight: F) -> u32 {
        self.decode(index).into_iter().map(|(member, value)| weight(member, value)).sum()
    }

    fn bound_index<B: Bindings>(&self, bindings: &B) -> usize {
        debug_assert!(self.members.iter().all(|&m| bindings.value(m).is_some()));
        self.index_or_zero(bindings)
    }
}
