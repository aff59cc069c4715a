//! Game: the persisted reference record for one speedrun category
//!
//! A [`Game`] holds the split list together with the reference run, the best
//! times ever recorded for each split, and lifetime counters. Its split sequence
//! is fixed in length once created; a [`Timer`](crate::Timer) bound to it reads the
//! references and writes results back when a run completes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timer::{RunRecord, SplitState};
use crate::types::{Micros, UNSET, is_set};
use crate::{Result, SplitsError};

/// Reference and best values for one split.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct GameSplit {
    /// Checkpoint name
    pub title: String,
    /// Cumulative reference time
    pub time: Micros,
    /// Reference time of the segment ending at this split
    pub segment: Micros,
    /// Best cumulative time ever reached at this split
    pub best_time: Micros,
    /// Best time ever for this segment
    pub best_segment: Micros,
}

/// Reference definition and history of one run category.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Game {
    /// Document the game was loaded from and is saved to
    pub path: PathBuf,
    pub title: Option<String>,
    pub theme: Option<String>,
    pub theme_variant: Option<String>,
    /// Display width hint, 0 when unset
    pub width: u32,
    /// Display height hint, 0 when unset
    pub height: u32,
    pub attempt_count: u32,
    pub finished_count: u32,
    pub world_record: Micros,
    /// Countdown before the run starts; the timer begins at `-start_delay`
    pub start_delay: Micros,
    splits: Vec<GameSplit>,
}

impl Game {
    /// Create a game with the given split titles and no times.
    pub fn new<P, I, S>(path: P, titles: I) -> Result<Self>
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles = titles.into_iter();
        let mut splits = allocate_splits(titles.size_hint().0)?;
        splits.extend(titles.map(|title| GameSplit { title: title.into(), ..Default::default() }));
        Ok(Self::from_splits(path.into(), splits))
    }

    pub(crate) fn from_splits(path: PathBuf, splits: Vec<GameSplit>) -> Self {
        Self { path, splits, ..Default::default() }
    }

    /// Load a game from a splits document. See [`crate::codec::load`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::codec::load(path)
    }

    /// Save this game to [`Game::path`]. See [`crate::codec::save`].
    pub fn save(&self) -> Result<()> {
        crate::codec::save(self)
    }

    /// Number of splits; fixed for the lifetime of the game.
    pub fn split_count(&self) -> usize {
        self.splits.len()
    }

    pub fn splits(&self) -> &[GameSplit] {
        &self.splits
    }

    /// Mutable access to the splits. The sequence length cannot change.
    pub fn splits_mut(&mut self) -> &mut [GameSplit] {
        &mut self.splits
    }

    pub fn split(&self, index: usize) -> Option<&GameSplit> {
        self.splits.get(index)
    }

    /// Final reference time, or 0 when the game has no complete reference.
    pub fn reference_time(&self) -> Micros {
        self.splits.last().map_or(UNSET, |split| split.time)
    }

    /// Recompute every segment from the cumulative reference times.
    ///
    /// Segment 0 is the first split's time; segment `i` is `time[i] - time[i-1]`
    /// when both are set, and unset otherwise.
    pub fn derive_segments(&mut self) {
        let mut previous: Option<Micros> = None;
        for split in &mut self.splits {
            split.segment = segment_between(previous, split.time);
            previous = Some(split.time);
        }
    }

    /// Fold a completed run into the reference record.
    ///
    /// `run` holds the timer's per-split state and `reached` is how many splits
    /// the run passed.
    pub(crate) fn update_splits(&mut self, run: &[SplitState], reached: usize) {
        if reached == 0 || run.len() != self.splits.len() {
            return;
        }
        let reached = reached.min(self.splits.len());
        let final_time = run.last().map_or(UNSET, |split| split.time);

        if is_set(final_time) && (!is_set(self.world_record) || final_time < self.world_record) {
            debug!(previous = self.world_record, record = final_time, "New world record");
            self.world_record = final_time;
        }

        let reference = self.reference_time();
        let personal_best = !is_set(reference) || final_time < reference;
        if personal_best {
            debug!(previous = reference, time = final_time, "Replacing reference splits");
        }
        for (split, result) in self.splits.iter_mut().zip(run).take(reached) {
            if personal_best {
                split.time = result.time;
            }
            split.segment = result.segment;
        }

        for (split, result) in self.splits.iter_mut().zip(run) {
            if is_set(result.time) && (!is_set(split.best_time) || result.time < split.best_time) {
                split.best_time = result.time;
            }
            if is_set(result.segment)
                && (!is_set(split.best_segment) || result.segment < split.best_segment)
            {
                split.best_segment = result.segment;
            }
        }
    }

    /// Copy the best split and segment times a released run reached.
    ///
    /// Used to keep new bests from a run that was abandoned before its final
    /// split. Splits the run never reached keep their current values.
    pub fn update_bests(&mut self, record: &RunRecord) {
        if record.splits.len() != self.splits.len() {
            return;
        }
        let reached = record.curr_split.min(self.splits.len());
        for (split, result) in self.splits.iter_mut().zip(&record.splits).take(reached) {
            split.best_time = result.best_time;
            split.best_segment = result.best_segment;
        }
        debug!(reached, "Saved bests from run");
    }
}

/// Segment time for a split given the previous split's time.
pub(crate) fn segment_between(previous: Option<Micros>, time: Micros) -> Micros {
    match previous {
        None if is_set(time) => time,
        Some(previous) if is_set(previous) && is_set(time) => {
            time.checked_sub(previous).unwrap_or(UNSET)
        }
        _ => UNSET,
    }
}

/// Reserve the split sequence without aborting on allocation failure.
pub(crate) fn allocate_splits(count: usize) -> Result<Vec<GameSplit>> {
    let mut splits = Vec::new();
    splits
        .try_reserve_exact(count)
        .map_err(|_| SplitsError::out_of_memory("game splits", count))?;
    Ok(splits)
}
