//! Time parsing, formatting and the monotonic clock
//!
//! Splits documents, the timer and presentation code all exchange times as
//! signed microsecond counts. This module converts them to and from text.

pub mod clock;
mod format;
mod parse;

pub use format::{
    Precision, TimeFormat, delta_string, format, millis_string, split_string, time_string,
};
pub use parse::{TimeParseError, parse, parse_stored, to_stored};
