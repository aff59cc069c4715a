//! Status flags raised on a split while a run is in progress
//!
//! The values match the bit layout used by existing splits tooling so a
//! `SplitInfo` can be handed to presentation code as a plain integer.

pub const BEHIND_TIME: u32 = 0x0001; // cumulative time behind the reference
pub const LOSING_TIME: u32 = 0x0002; // delta worse than at the previous split
pub const BEST_SPLIT: u32 = 0x0004; // new best cumulative time
pub const BEST_SEGMENT: u32 = 0x0008; // new best segment time
