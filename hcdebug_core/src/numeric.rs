//! Parsers for the numbers typed into register and address fields.

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case};
use nom::character::complete::{digit1, hex_digit1, space0};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::{delimited, preceded};
use nom::IResult;

fn hex_literal(input: &str) -> IResult<&str, u64> {
    map_res(
        preceded(alt((tag_no_case("0x"), tag("$"))), hex_digit1),
        |digits: &str| u64::from_str_radix(digits, 16),
    )(input)
}

fn bare_hex(input: &str) -> IResult<&str, u64> {
    map_res(hex_digit1, |digits: &str| u64::from_str_radix(digits, 16))(input)
}

fn decimal_literal(input: &str) -> IResult<&str, u64> {
    map_res(digit1, str::parse::<u64>)(input)
}

fn trimmed<'a, F>(parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, u64>
where
    F: FnMut(&'a str) -> IResult<&'a str, u64>,
{
    all_consuming(delimited(space0, parser, space0))
}

/// Parses the contents of a hexadecimal field. The `0x`/`$` prefix is optional.
pub fn parse_hex(input: &str) -> Option<u64> {
    trimmed(alt((hex_literal, bare_hex)))(input)
        .ok()
        .map(|(_, value)| value)
}

/// Parses the contents of a decimal field.
pub fn parse_decimal(input: &str) -> Option<u64> {
    trimmed(decimal_literal)(input).ok().map(|(_, value)| value)
}

/// Parses `0x1F`/`$1F` as hex and anything else as decimal.
pub fn parse_literal(input: &str) -> Option<u64> {
    trimmed(alt((hex_literal, decimal_literal)))(input)
        .ok()
        .map(|(_, value)| value)
}
