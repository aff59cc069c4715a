//! Monotonic microsecond clock for hosts driving `Timer::step`

use std::sync::OnceLock;
use std::time::Instant;

use crate::types::Micros;

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Microseconds elapsed on a monotonic clock since its first use in this process.
///
/// Values never decrease, which is all `Timer::step` requires.
pub fn now() -> Micros {
    let anchor = *ANCHOR.get_or_init(Instant::now);
    i64::try_from(anchor.elapsed().as_micros()).unwrap_or(Micros::MAX)
}
