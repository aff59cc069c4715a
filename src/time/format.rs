//! Time display formatting for presentation code

use serde::{Deserialize, Serialize};

use crate::types::Micros;

const MICROS_PER_MINUTE: u64 = 60_000_000;
const MICROS_PER_HOUR: u64 = 60 * MICROS_PER_MINUTE;

/// Number of sub-second digits shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Precision {
    /// Two digits, truncated
    #[default]
    Centiseconds,
    /// All six digits
    Microseconds,
}

/// Display options for a time value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct TimeFormat {
    pub precision: Precision,
    /// Show only the two largest components (`H:MM`, `M:SS` or `S.ss`)
    pub compact: bool,
    /// Prefix non-negative values with `+`
    pub delta: bool,
}

impl TimeFormat {
    /// Running time: `1:02:03.45`
    pub const TIME: TimeFormat =
        TimeFormat { precision: Precision::Centiseconds, compact: false, delta: false };

    /// Split column: `1:02`
    pub const SPLIT: TimeFormat =
        TimeFormat { precision: Precision::Centiseconds, compact: true, delta: false };

    /// Delta column: `+1:02`, `-3.40`
    pub const DELTA: TimeFormat =
        TimeFormat { precision: Precision::Centiseconds, compact: true, delta: true };

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn with_delta(mut self, delta: bool) -> Self {
        self.delta = delta;
        self
    }
}

/// Format `time` according to `format`.
pub fn format(time: Micros, format: TimeFormat) -> String {
    render(time, format, false).0
}

/// Running time with centiseconds.
pub fn time_string(time: Micros) -> String {
    format(time, TimeFormat::TIME)
}

/// Compact split time.
pub fn split_string(time: Micros) -> String {
    format(time, TimeFormat::SPLIT)
}

/// Compact signed delta.
pub fn delta_string(time: Micros) -> String {
    format(time, TimeFormat::DELTA)
}

/// Running time split into the whole part and the sub-second digits, for
/// timers that draw the digits smaller.
///
/// ```rust
/// use splitkeeper::time;
///
/// assert_eq!(time::millis_string(83_456_000), ("1:23".to_string(), "45".to_string()));
/// ```
pub fn millis_string(time: Micros) -> (String, String) {
    render(time, TimeFormat::TIME, true)
}

fn render(time: Micros, format: TimeFormat, detach_subseconds: bool) -> (String, String) {
    let sign = if time < 0 {
        "-"
    } else if format.delta {
        "+"
    } else {
        ""
    };
    let magnitude = time.unsigned_abs();
    let hours = magnitude / MICROS_PER_HOUR;
    let minutes = (magnitude / MICROS_PER_MINUTE) % 60;
    let seconds = (magnitude / 1_000_000) % 60;
    let subseconds = magnitude % 1_000_000;

    let digits = match format.precision {
        Precision::Centiseconds => format!("{:02}", subseconds / 10_000),
        Precision::Microseconds => format!("{:06}", subseconds),
    };
    let (dot_digits, detached) =
        if detach_subseconds { (String::new(), digits) } else { (format!(".{}", digits), String::new()) };

    let whole = if hours > 0 {
        if format.compact {
            format!("{sign}{hours}:{minutes:02}")
        } else {
            format!("{sign}{hours}:{minutes:02}:{seconds:02}{dot_digits}")
        }
    } else if minutes > 0 {
        if format.compact {
            format!("{sign}{minutes}:{seconds:02}")
        } else {
            format!("{sign}{minutes}:{seconds:02}{dot_digits}")
        }
    } else {
        format!("{sign}{seconds}{dot_digits}")
    };

    (whole, detached)
}
