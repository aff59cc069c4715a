//! Speedrun split timing engine with a typed splits document codec.
//!
//! Splitkeeper measures speedrun attempts against a stored reference run. A
//! [`Game`] is the persisted record of one category: its splits, the reference
//! times, the best split and segment times ever reached, and lifetime counters.
//! A [`Timer`] borrows a game for the length of a run and is driven by the host
//! with a monotonic clock.
//!
//! # Features
//!
//! - **Timer state machine**: start, split, skip, unsplit, stop, reset and cancel
//!   with live deltas and gold/behind/losing flags
//! - **Document codec**: JSON (and YAML) splits documents with atomic saves
//! - **Time values**: microsecond parsing and display formatting
//! - **Async offload**: load and save on Tokio's blocking pool
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use splitkeeper::{Timer, time};
//!
//! fn main() -> splitkeeper::Result<()> {
//!     let mut game = splitkeeper::load("splits/sm64-16star.json")?;
//!     {
//!         let mut timer = Timer::new(&mut game)?;
//!         timer.step(time::clock::now());
//!         timer.start();
//!         // Render loop: step, then read timer.splits()
//!         timer.step(time::clock::now());
//!         println!("{}", time::time_string(timer.time()));
//!     }
//!     game.save()
//! }
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod time;
pub mod types;

// Game record and live run
pub mod game;
pub mod timer;

// Document format
pub mod codec;

// Core exports
pub use error::*;
pub use types::{Micros, SplitInfo};

// Main API exports
pub use codec::{DocumentFormat, load, load_async, save, save_async};
pub use game::{Game, GameSplit};
pub use time::TimeFormat;
pub use timer::{RunRecord, SplitState, Timer, TimerSnapshot};
