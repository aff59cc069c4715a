//! SplitInfo bitset for per-split status flags

use serde::{Deserialize, Serialize};

use super::split_flags;

/// Bitset of [`split_flags`] raised on one split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SplitInfo(pub u32);

impl SplitInfo {
    /// Create a new SplitInfo from a raw flag value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Check if a specific flag is set using a bitmask.
    pub fn has_flag(&self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Raise `flag`.
    pub fn insert(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clear `flag`.
    pub fn remove(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Raise or clear `flag` depending on `on`.
    pub fn set(&mut self, flag: u32, on: bool) {
        if on { self.insert(flag) } else { self.remove(flag) }
    }

    /// Clear every flag.
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Get the raw u32 value.
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_behind(&self) -> bool {
        self.has_flag(split_flags::BEHIND_TIME)
    }

    pub fn is_losing(&self) -> bool {
        self.has_flag(split_flags::LOSING_TIME)
    }

    pub fn is_best_split(&self) -> bool {
        self.has_flag(split_flags::BEST_SPLIT)
    }

    pub fn is_best_segment(&self) -> bool {
        self.has_flag(split_flags::BEST_SEGMENT)
    }
}
