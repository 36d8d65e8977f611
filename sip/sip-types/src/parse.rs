//! Parsing utilities for header values

use nom::bytes::complete::{escaped_transform, is_not};
use nom::character::complete::{anychar, char};
use nom::combinator::{map, opt};
use nom::error::VerboseError;
use nom::sequence::delimited;

pub(crate) type IResult<I, O> = nom::IResult<I, O, VerboseError<I>>;

/// Parses a quoted-string, returning its content with quoted-pairs resolved
pub(crate) fn parse_quoted(i: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(is_not("\"\\"), '\\', anychar)),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(i)
}

pub(crate) fn whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

#[rustfmt::skip]
pub(crate) fn token(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '.' | '!' | '%' | '*' | '_' | '`' | '\'' | '~' | '+')
}
