//! Duration grammar.
//!
//! Accepts up to four components in fixed order, each optional, separated
//! by optional whitespace:
//! ```text
//! [<n>d] [<n>h] [<n>m] [<n>s]
//! ```
//! Unit letters are case-insensitive. At least one component is required and
//! the whole input must be consumed.

use crate::error::DurationError;
use nom::{
    bytes::complete::{tag_no_case, take_while},
    character::complete::digit1,
    combinator::opt,
    sequence::{preceded, terminated},
    IResult,
};
use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// One optional `<digits><unit>` component, after optional whitespace.
fn component<'a>(unit: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, Option<&'a str>> {
    preceded(
        take_while(char::is_whitespace),
        opt(terminated(digit1, tag_no_case(unit))),
    )
}

/// Parse all four components; never fails, absent parts are `None`.
#[allow(clippy::type_complexity)]
fn components(
    input: &str,
) -> IResult<&str, (Option<&str>, Option<&str>, Option<&str>, Option<&str>)> {
    let (input, days) = component("d")(input)?;
    let (input, hours) = component("h")(input)?;
    let (input, minutes) = component("m")(input)?;
    let (input, seconds) = component("s")(input)?;
    let (input, _) = take_while(char::is_whitespace)(input)?;
    Ok((input, (days, hours, minutes, seconds)))
}

/// Parse a duration such as `1d 23h 59m 59s`, `90s` or `2h30m`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (rest, (days, hours, minutes, seconds)) = components(input).map_err(|_| {
        DurationError::Malformed {
            input: input.to_string(),
            position: 0,
        }
    })?;

    if !rest.is_empty() {
        return Err(DurationError::Malformed {
            input: input.to_string(),
            position: input.len() - rest.len(),
        });
    }

    if days.is_none() && hours.is_none() && minutes.is_none() && seconds.is_none() {
        return Err(DurationError::Empty);
    }

    let overflow = || DurationError::Overflow(input.to_string());
    let mut total: u64 = 0;
    for (digits, scale) in [
        (days, SECS_PER_DAY),
        (hours, SECS_PER_HOUR),
        (minutes, SECS_PER_MINUTE),
        (seconds, 1),
    ] {
        let Some(digits) = digits else { continue };
        let value: u64 = digits.parse().map_err(|_| overflow())?;
        let secs = value.checked_mul(scale).ok_or_else(overflow)?;
        total = total.checked_add(secs).ok_or_else(overflow)?;
    }

    Ok(Duration::from_secs(total))
}

/// Render a duration in the same grammar, omitting zero components.
///
/// Sub-second precision is dropped. A zero duration renders as `0s`.
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }

    let mut parts = Vec::with_capacity(4);
    for (unit, scale) in [
        ('d', SECS_PER_DAY),
        ('h', SECS_PER_HOUR),
        ('m', SECS_PER_MINUTE),
        ('s', 1),
    ] {
        let value = secs / scale;
        if value > 0 {
            parts.push(format!("{}{}", value, unit));
            secs %= scale;
        }
    }
    parts.join(" ")
}
