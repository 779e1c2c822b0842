// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::collections::VecDeque;

use crate::BindingTable;

/// First in, first out queue of parameters whose value is forced next.
///
/// A parameter is queued when it is the last unbound member of a combination.
#[derive(Clone, Debug, Default)]
pub struct WorkList {
    queue: VecDeque<usize>,
}

impl WorkList {
    /// Create an empty work list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the parameter unless it is pending already. Queued parameters become pending.
    pub fn add(&mut self, parameter: usize, bindings: &mut BindingTable) {
        if !bindings.is_pending(parameter) {
            debug_assert!(!bindings.is_bound(parameter));
            self.queue.push_back(parameter);
            bindings.mark_pending(parameter);
        }
    }

    /// Take the parameter at the front.
    pub fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    /// The number of queued parameters.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
