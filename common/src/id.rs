// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// Handles into the dense tables of the [SUT](../sut/struct.SUT.html) arena.
///
/// Ids are handed out in creation order, which makes them usable as stable sequence numbers.
pub trait Id: 'static + Copy + Send + Sync + Display + Debug + Hash + Eq + Ord {
    /// Convert to [usize].
    fn as_usize(self) -> usize;

    /// Convert from [usize].
    fn from_usize(other: usize) -> Self;
}

macro_rules! as_id {
    ($(#[$meta:meta])* $t:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Default, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $t(u32);

        impl Id for $t {
            #[inline(always)]
            fn as_usize(self) -> usize { self.0 as usize }
            #[inline(always)]
            fn from_usize(other: usize) -> Self { $t(other as u32) }
        }

        impl Display for $t {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

as_id!(
    /// Refers to a parameter, either authored or synthesised for a sub-model.
    ParameterId, "p"
);
as_id!(
    /// Refers to a model in the model tree.
    ModelId, "m"
);

/// One (parameter, value index) pair, the building block of exclusions and seed rows.
///
/// Terms sort by the parameter id first, so sorted term lists follow the input sequence of the parameters.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Term {
    /// The parameter this term constrains.
    pub parameter: ParameterId,
    /// The zero-based value index.
    pub value: usize,
}

impl Term {
    /// Create a new [Term].
    pub fn new(parameter: ParameterId, value: usize) -> Self {
        Self { parameter, value }
    }
}

impl From<(ParameterId, usize)> for Term {
    fn from((parameter, value): (ParameterId, usize)) -> Self {
        Self { parameter, value }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.parameter, self.value)
    }
}
