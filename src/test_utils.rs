//! Test utilities for fixture lookup and sample games
//!
//! Shared by unit tests and, through the `benchmark` feature, by the benches.

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};

use crate::game::{Game, segment_between};
use crate::types::Micros;

/// Error returned when a required splits fixture cannot be located.
#[derive(Debug, Clone)]
pub struct FixtureError {
    message: String,
}

impl FixtureError {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FixtureError {}

/// Directory holding the splits document fixtures.
pub fn splits_fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join("splits")
}

/// Resolve a fixture under `test-data/splits/`, failing if it is missing.
pub fn require_splits_fixture(name: &str) -> Result<PathBuf, FixtureError> {
    let path = splits_fixture_dir().join(name);
    if path.exists() {
        Ok(path)
    } else {
        Err(FixtureError::new(format!("Missing splits fixture: {}", path.display())))
    }
}

/// A game whose reference run has the given cumulative times.
///
/// Segments are derived and the bests start equal to the reference, the same
/// defaults a document without `best_time`/`best_segment` fields loads with.
pub fn game_with_times(times: &[Micros]) -> Game {
    let titles = (1..=times.len()).map(|i| format!("Split {}", i));
    let mut game = Game::new("test-game.json", titles).expect("allocating test splits");
    let mut previous = None;
    for (split, &time) in game.splits_mut().iter_mut().zip(times) {
        split.time = time;
        split.segment = segment_between(previous, time);
        split.best_time = time;
        split.best_segment = split.segment;
        previous = Some(time);
    }
    game
}

/// A game with `count` splits and no times at all.
pub fn empty_game(count: usize) -> Game {
    let titles = (1..=count).map(|i| format!("Split {}", i));
    Game::new("empty-game.json", titles).expect("allocating test splits")
}
