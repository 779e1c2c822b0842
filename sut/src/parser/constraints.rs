// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::opt;
use nom::multi::separated_list1;
use nom::IResult;

use common::NEGATIVE_PREFIX;

use super::parameters::parse_order;
use super::read_value;

fn parse_term(text: &str) -> IResult<&str, (&str, &str)> {
    let (text, parameter) = read_value(text)?;
    let (text, _) = tag("=")(text)?;
    let (text, _) = multispace0(text)?;
    let (text, _) = opt(char(NEGATIVE_PREFIX))(text)?;
    let (text, value) = read_value(text)?;
    Ok((text, (parameter, value)))
}

/// `$exclude a = x && b = y;`
pub(crate) fn parse_exclusion(text: &str) -> IResult<&str, Vec<(&str, &str)>> {
    let (text, _) = multispace0(text)?;
    let (text, _) = tag("$exclude")(text)?;
    let (text, _) = multispace1(text)?;
    let (text, terms) = separated_list1(tag("&&"), parse_term)(text)?;
    let (text, _) = tag(";")(text)?;
    Ok((text, terms))
}

/// `$submodel a, b @ 2;`
pub(crate) fn parse_submodel(text: &str) -> IResult<&str, (Vec<&str>, Option<usize>)> {
    let (text, _) = multispace0(text)?;
    let (text, _) = tag("$submodel")(text)?;
    let (text, _) = multispace1(text)?;
    let (text, names) = separated_list1(tag(","), read_value)(text)?;
    let (text, order) = opt(parse_order)(text)?;
    let (text, _) = tag(";")(text)?;
    Ok((text, (names, order)))
}
