// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate generates the rows of a test suite for a [sut::SUT].
//!
//! # Features
//! - Greedy row construction: every row starts from a seed, then the parameters forced by the [WorkList] are bound,
//!   and when the work list is empty the combination with the most open cells decides.
//! - Hierarchical models: sub-models are generated first and take part in their parent as pseudo-parameters.
//! - Exclusions are derived before generation, so no row has to be abandoned halfway.
//! - [common::GenerationMode::Preview] tolerates dead ends and filters the rows afterwards,
//!   [common::GenerationMode::Approximate] draws random rows until everything is covered or the tries run out.
//!
//! # Example
//! ```
//! use common::Term;
//! use generator::Task;
//!
//! let mut task = Task::new();
//! let model = task.create_model(0);
//! let a = task.add_parameter(model, 3, None, None).unwrap();
//! let b = task.add_parameter(model, 3, None, None).unwrap();
//! task.add_parameter(model, 3, None, None).unwrap();
//! task.add_exclusion(&[Term::new(a, 0), Term::new(b, 0)]).unwrap();
//! task.generate().unwrap();
//!
//! let mut row = vec![0; task.total_parameter_count()];
//! while task.next_result_row(&mut row) > 0 {
//!     assert!(row[0] != 0 || row[1] != 0);
//! }
//! ```

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

pub use binding::BindingTable;
pub use model::{generate_model, Context};
pub use task::Task;
pub use worklist::WorkList;

mod binding;
mod model;
mod task;
mod worklist;

#[cfg(test)]
mod test;
