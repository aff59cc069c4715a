//! Core value types shared by the game record and the timer.
//!
//! ## Time values
//!
//! Every time is a signed count of microseconds ([`Micros`]). A value of `0`
//! means "unset": the game has no reference yet, or the split was skipped. A
//! genuine zero-length segment cannot be represented.
//!
//! ## Split status
//!
//! [`SplitInfo`] is a bitset over the constants in [`split_flags`]:
//!
//! ```rust
//! use splitkeeper::types::{SplitInfo, split_flags};
//!
//! let mut info = SplitInfo::default();
//! info.insert(split_flags::BEHIND_TIME);
//! info.set(split_flags::LOSING_TIME, true);
//! assert!(info.is_behind() && info.is_losing());
//! assert!(!info.is_best_split());
//! ```

pub mod split_flags;
mod split_info;

pub use split_info::SplitInfo;

/// Signed time in microseconds.
pub type Micros = i64;

/// Sentinel for a time that has not been measured.
pub const UNSET: Micros = 0;

/// Microseconds per second.
pub const MICROS_PER_SECOND: Micros = 1_000_000;

/// Whether `time` carries a measurement.
pub fn is_set(time: Micros) -> bool {
    time != UNSET
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_flag_operations(value in any::<u32>(), bit_index in 0..32u32) {
            let mut info = SplitInfo::new(value);
            let flag = 1 << bit_index;
            prop_assert_eq!(info.has_flag(flag), (value & flag) != 0);

            info.insert(flag);
            prop_assert!(info.has_flag(flag));
            info.remove(flag);
            prop_assert!(!info.has_flag(flag));
            prop_assert_eq!(info.value() | flag, value | flag);
        }
    }

    #[test]
    fn split_flags_are_distinct_bits() {
        let all = [
            split_flags::BEHIND_TIME,
            split_flags::LOSING_TIME,
            split_flags::BEST_SPLIT,
            split_flags::BEST_SEGMENT,
        ];
        for (i, a) in all.iter().enumerate() {
            assert_eq!(a.count_ones(), 1);
            for b in &all[i + 1..] {
                assert_eq!(a & b, 0);
            }
        }
    }

    #[test]
    fn set_toggles_flags() {
        let mut info = SplitInfo::default();
        info.set(split_flags::BEST_SEGMENT, true);
        assert!(info.is_best_segment());
        info.set(split_flags::BEST_SEGMENT, false);
        assert_eq!(info, SplitInfo::default());
    }

    #[test]
    fn zero_is_unset() {
        assert!(!is_set(UNSET));
        assert!(is_set(-1));
        assert!(is_set(MICROS_PER_SECOND));
    }
}
