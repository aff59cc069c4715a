//! Time value grammar
//!
//! `[-]H:MM:SS[.ffffff]`, `[-]M:SS[.ffffff]` or `[-]S[.ffffff]`. Fractional digits
//! past microsecond resolution are truncated. The empty string is the unset time.

use thiserror::Error;

use crate::types::{MICROS_PER_SECOND, Micros, UNSET};

/// Fractional digits kept by the grammar.
const FRACTION_DIGITS: usize = 6;

/// Error returned for strings outside the time grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("expected H:MM:SS, M:SS or S, found '{input}'")]
    InvalidComponents { input: String },

    #[error("invalid number '{component}' in time '{input}'")]
    InvalidNumber { input: String, component: String },

    #[error("time '{input}' is out of range")]
    OutOfRange { input: String },
}

/// Parse a human-readable time into microseconds.
///
/// ```rust
/// use splitkeeper::time;
///
/// assert_eq!(time::parse("1:02:03.5").unwrap(), 3_723_500_000);
/// assert_eq!(time::parse("-0.25").unwrap(), -250_000);
/// assert_eq!(time::parse("").unwrap(), 0);
/// ```
pub fn parse(input: &str) -> Result<Micros, TimeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(UNSET);
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (whole, fraction) = match body.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (body, None),
    };

    let out_of_range = || TimeParseError::OutOfRange { input: input.to_string() };

    // ".5" is half a second
    let seconds = if whole.is_empty() && fraction.is_some() {
        0
    } else {
        let components: Vec<&str> = whole.split(':').collect();
        if components.len() > 3 {
            return Err(TimeParseError::InvalidComponents { input: input.to_string() });
        }
        let mut seconds: i64 = 0;
        for component in components {
            let value = parse_digits(component, input)?;
            seconds = seconds
                .checked_mul(60)
                .and_then(|s| s.checked_add(value))
                .ok_or_else(out_of_range)?;
        }
        seconds
    };

    let subseconds = match fraction {
        Some(digits) => parse_fraction(digits, input)?,
        None => 0,
    };

    let total = seconds
        .checked_mul(MICROS_PER_SECOND)
        .and_then(|micros| micros.checked_add(subseconds))
        .ok_or_else(out_of_range)?;

    Ok(if negative { -total } else { total })
}

/// Parse a time as stored in a splits document.
///
/// Saved documents hold the raw signed microsecond count (`"-1500000"`); hand
/// edited documents may use the human grammar instead (`"1:23.45"`). A string that
/// is only an optional sign and digits is always read as the raw form.
pub fn parse_stored(input: &str) -> Result<Micros, TimeParseError> {
    let trimmed = input.trim();
    if is_raw_form(trimmed) {
        return trimmed
            .parse::<i64>()
            .map_err(|_| TimeParseError::OutOfRange { input: input.to_string() });
    }
    parse(input)
}

/// Render `time` in the raw stored form.
pub fn to_stored(time: Micros) -> String {
    time.to_string()
}

fn is_raw_form(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_digits(component: &str, input: &str) -> Result<i64, TimeParseError> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::InvalidNumber {
            input: input.to_string(),
            component: component.to_string(),
        });
    }
    component.parse::<i64>().map_err(|_| TimeParseError::OutOfRange { input: input.to_string() })
}

fn parse_fraction(digits: &str, input: &str) -> Result<i64, TimeParseError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::InvalidNumber {
            input: input.to_string(),
            component: digits.to_string(),
        });
    }
    let kept = &digits[..digits.len().min(FRACTION_DIGITS)];
    let mut value: i64 = 0;
    for (i, b) in kept.bytes().enumerate() {
        value += i64::from(b - b'0') * 10_i64.pow((FRACTION_DIGITS - 1 - i) as u32);
    }
    Ok(value)
}
