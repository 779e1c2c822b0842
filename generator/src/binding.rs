// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use cm::Bindings;
use common::GenerationError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Slot {
    bound: bool,
    pending: bool,
    value: usize,
}

/// The state of every parameter of a model while one row is built.
///
/// Parameters are referred to by their index in the model. The table is reset before every row.
#[derive(Clone, Debug)]
pub struct BindingTable {
    slots: Vec<Slot>,
    unbound: usize,
}

impl BindingTable {
    /// Create a table for the given number of parameters, all unbound.
    pub fn new(size: usize) -> Self {
        Self { slots: vec![Slot::default(); size], unbound: size }
    }

    /// Unbind every parameter and clear the pending flags.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::default());
        self.unbound = self.slots.len();
    }

    /// The number of parameters.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no parameters.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The number of parameters without a value in the current row.
    pub fn unbound_count(&self) -> usize {
        self.unbound
    }

    /// Whether the parameter has a value in the current row.
    pub fn is_bound(&self, parameter: usize) -> bool {
        self.slots[parameter].bound
    }

    /// Whether the parameter is waiting on the work list, or about to be bound.
    pub fn is_pending(&self, parameter: usize) -> bool {
        self.slots[parameter].pending
    }

    /// Mark the parameter as pending, so it is not put on the work list.
    pub fn mark_pending(&mut self, parameter: usize) {
        self.slots[parameter].pending = true;
    }

    /// Give the parameter its value for the current row.
    pub fn bind(&mut self, parameter: usize, value: usize) -> Result<(), GenerationError> {
        let slot = &mut self.slots[parameter];
        if slot.bound {
            return Err(GenerationError::Failure(format!("parameter {} is bound twice", parameter)));
        }
        slot.bound = true;
        slot.value = value;
        self.unbound -= 1;
        Ok(())
    }

    /// Pretend the parameter has the given value, to score it. Undo with [BindingTable::release].
    pub fn trial(&mut self, parameter: usize, value: usize) {
        debug_assert!(!self.slots[parameter].bound);
        let slot = &mut self.slots[parameter];
        slot.bound = true;
        slot.value = value;
    }

    /// Undo a [BindingTable::trial].
    pub fn release(&mut self, parameter: usize) {
        self.slots[parameter].bound = false;
    }

    /// The values of the current row, [None] for unbound parameters.
    pub fn row(&self) -> Vec<Option<usize>> {
        self.slots.iter().map(|slot| if slot.bound { Some(slot.value) } else { None }).collect()
    }
}

impl Bindings for BindingTable {
    fn value(&self, parameter: usize) -> Option<usize> {
        let slot = &self.slots[parameter];
        if slot.bound { Some(slot.value) } else { None }
    }
}
