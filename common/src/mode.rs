// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How strictly a run should honour coverage and exclusions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GenerationMode {
    /// Cover every interaction, derive implied exclusions, never emit an excluded tuple.
    #[default]
    Regular,

    /// Tolerate dead ends while binding values, drop violating rows afterwards.
    Preview,

    /// Draw random rows until a budget of failed draws is exhausted.
    Approximate,
}

/// The way a single model arranges its parameters into combinations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GenerationType {
    /// Every parameter uses its own order.
    #[default]
    MixedOrder,

    /// Every parameter uses the order of the model.
    FixedOrder,

    /// One combination over all parameters.
    Full,

    /// One row per value index.
    Flat,

    /// Order one, truncated to the maximum number of rows.
    Random,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regular" => Ok(GenerationMode::Regular),
            "preview" => Ok(GenerationMode::Preview),
            "approximate" => Ok(GenerationMode::Approximate),
            _ => Err(format!("Unknown generation mode '{}'", s)),
        }
    }
}

impl Display for GenerationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GenerationMode::Regular => "regular",
            GenerationMode::Preview => "preview",
            GenerationMode::Approximate => "approximate",
        })
    }
}

impl FromStr for GenerationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mixed" => Ok(GenerationType::MixedOrder),
            "fixed" => Ok(GenerationType::FixedOrder),
            "full" => Ok(GenerationType::Full),
            "flat" => Ok(GenerationType::Flat),
            "random" => Ok(GenerationType::Random),
            _ => Err(format!("Unknown generation type '{}'", s)),
        }
    }
}
