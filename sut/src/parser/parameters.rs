// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace0};
use nom::combinator::{map_res, opt};
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded};
use nom::IResult;

use common::NEGATIVE_PREFIX;

use super::{read_number, read_value, RawParameter, RawValue};

pub(crate) fn parse_order(text: &str) -> IResult<&str, usize> {
    preceded(tag("@"), read_number)(text)
}

fn parse_weight(text: &str) -> IResult<&str, u32> {
    delimited(tag("("), map_res(read_number, u32::try_from), tag(")"))(text)
}

fn parse_value(text: &str) -> IResult<&str, RawValue> {
    let (text, _) = multispace0(text)?;
    let (text, negative) = opt(char(NEGATIVE_PREFIX))(text)?;
    let (text, label) = read_value(text)?;
    let (text, weight) = opt(parse_weight)(text)?;
    let (text, _) = multispace0(text)?;
    Ok((text, RawValue { label, negative: negative.is_some(), weight }))
}

fn parse_values(text: &str) -> IResult<&str, Vec<RawValue>> {
    separated_list1(tag(","), parse_value)(text)
}

pub(crate) fn parse_parameter(text: &str) -> IResult<&str, RawParameter> {
    let (text, _) = multispace0(text)?;
    let (text, expected_result) = opt(char('$'))(text)?;
    let (text, name) = read_value(text)?;
    let (text, order) = opt(parse_order)(text)?;
    let (text, _) = tag(":")(text)?;
    let (text, values) = parse_values(text)?;
    let (text, _) = tag(";")(text)?;
    Ok((text, RawParameter { name, expected_result: expected_result.is_some(), order, values }))
}
