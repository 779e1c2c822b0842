// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides common features used throughout the generation crates and the data-types of Combica.
//!
//! # Features
//!   * `sub-time` Log the timings for all the [sub_time_it] calls.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

pub use error::{ErrorCode, GenerationError};
pub use id::{Id, ModelId, ParameterId, Term};
pub use mode::{GenerationMode, GenerationType};
pub use random::Random;
#[doc(hidden)]
pub use tracing;

mod error;
mod id;
mod mode;
mod random;

/// The smallest order a parameter can be covered with.
pub const MIN_ORDER: usize = 1;

/// The number of rows [GenerationType::Full] may produce before giving up with [GenerationError::TooManyRows].
pub const MAX_ROWS_TO_GENERATE: u64 = 1_000_000;

/// The number of random rows tried in [GenerationMode::Approximate] before a model stops generating.
pub const DEFAULT_MAX_RANDOM_TRIES: usize = 1000;

/// The value stored in a result row when an expected result can not be determined.
pub const UNDEFINED_VALUE: usize = usize::MAX;

/// The text to print when a value is undefined.
pub const UNDEFINED_TEXT: &str = "?";

/// The prefix marking negative values.
pub const NEGATIVE_PREFIX: char = '~';

/// Log the time it took to provide the result of the provided expression.
/// Returns the result of the provided expression.
///
/// # Example
/// ```
/// use common::time_it;
///
/// time_it!(0 + 1, "Addition");
/// ```
#[macro_export]
macro_rules! time_it {
    ($code:expr, $text:expr) => {{
        let now = std::time::Instant::now();
        let result = $code;
        let duration = now.elapsed();
        $crate::tracing::info!(phase = $text, seconds = duration.as_secs_f64(), "{} takes: {}.{:06}s", $text, duration.as_secs(), duration.subsec_micros());
        result
    }};
}

/// Act like [time_it] if the `sub-time` feature is set. Otherwise return the provided expression.
///
/// # Example
/// ```
/// use common::sub_time_it;
///
/// sub_time_it!(0 + 1, "Addition");
/// ```
///
/// The `sub-time` feature has been set.
#[cfg(feature = "sub-time")]
#[macro_export]
macro_rules! sub_time_it {
    ($code:expr, $text:expr) => {{
        $crate::time_it!($code, $text)
    }};
}

/// Act like [time_it] if the `sub-time` feature is set. Otherwise return the provided expression.
///
/// # Example
/// ```
/// use common::sub_time_it;
///
/// sub_time_it!(0 + 1, "Addition");
/// ```
///
/// The `sub-time` feature has not been set.
#[cfg(not(feature = "sub-time"))]
#[macro_export]
macro_rules! sub_time_it {
    ($code:expr, $text:expr) => {{$code}};
}

#[cfg(test)]
mod test {
    #[test]
    fn test_time_it() {
        let a = time_it!(0, "hi");
        assert_eq!(0, a);
        let a = sub_time_it!(0, "hi");
        assert_eq!(0, a);
    }
}
