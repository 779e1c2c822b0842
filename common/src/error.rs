// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use thiserror::Error;

/// Everything that can stop a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A coverage map or result table could not be allocated.
    #[error("out of memory")]
    OutOfMemory,

    /// The abort predicate asked to stop.
    #[error("generation cancelled")]
    Cancelled,

    /// The exhaustive cross product is larger than allowed.
    #[error("the exhaustive suite would exceed {limit} rows")]
    TooManyRows {
        /// The row ceiling that was exceeded.
        limit: u64,
    },

    /// No legal value existed where one was required.
    #[error("generation failed: {0}")]
    Failure(String),

    /// Anything else.
    #[error("unknown generation error: {0}")]
    Unknown(String),
}

/// The coarse outcome reported across a handle-based interface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// See [GenerationError::OutOfMemory].
    OutOfMemory,
    /// Any other [GenerationError].
    GenerationError,
}

impl GenerationError {
    /// Collapse this error into an [ErrorCode].
    pub fn code(&self) -> ErrorCode {
        match self {
            GenerationError::OutOfMemory => ErrorCode::OutOfMemory,
            _ => ErrorCode::GenerationError,
        }
    }
}

impl From<std::collections::TryReserveError> for GenerationError {
    fn from(_: std::collections::TryReserveError) -> Self {
        GenerationError::OutOfMemory
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ErrorCode::OutOfMemory, GenerationError::OutOfMemory.code());
        assert_eq!(ErrorCode::GenerationError, GenerationError::Cancelled.code());
        assert_eq!(ErrorCode::GenerationError, GenerationError::TooManyRows { limit: 1 }.code());
        assert_eq!(ErrorCode::GenerationError, GenerationError::Failure("x".into()).code());
    }

    #[test]
    fn test_messages() {
        assert_eq!("the exhaustive suite would exceed 10 rows", GenerationError::TooManyRows { limit: 10 }.to_string());
        assert_eq!("generation failed: no value", GenerationError::Failure("no value".into()).to_string());
    }
}
