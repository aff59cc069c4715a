//! The live run: a split timer bound to one [`Game`]
//!
//! A [`Timer`] measures one attempt against the game's reference run. The host
//! drives it by calling [`Timer::step`] with a monotonic microsecond clock (see
//! [`crate::time::clock::now`]) at whatever cadence it renders, and forwards user
//! or autosplitter input to [`start`](Timer::start), [`split`](Timer::split),
//! [`skip`](Timer::skip), [`unsplit`](Timer::unsplit), [`stop`](Timer::stop),
//! [`reset`](Timer::reset) and [`cancel`](Timer::cancel).
//!
//! ## State
//!
//! There is no explicit state enum. Progress is the product of three values:
//!
//! - `started`: the attempt counter has been incremented for this attempt
//! - `running`: time is accumulating
//! - `curr_split`: index of the next split, `split_count` once the run is done
//!
//! Every operation is total. Calls whose preconditions do not hold are no-ops
//! that return `0` or `false`.
//!
//! ## Game binding
//!
//! The timer holds `&mut Game` for its whole lifetime. It increments the game's
//! attempt and finished counters in place and, when the last split is reached,
//! folds the run into the game's reference and best times. Drop the timer (or
//! [`release`](Timer::release) it) to get the game back.
//!
//! ```rust
//! use splitkeeper::{Game, Timer};
//!
//! let mut game = Game::new("sm64.json", ["Bob-omb Battlefield", "Bowser"])?;
//! let mut timer = Timer::new(&mut game)?;
//!
//! timer.step(0);
//! timer.start();
//! timer.step(30_000_000);
//! assert_eq!(timer.split(), 1);
//! timer.step(95_000_000);
//! assert_eq!(timer.split(), 2);
//! assert!(timer.is_complete());
//!
//! drop(timer);
//! assert_eq!(game.world_record, 95_000_000);
//! assert_eq!(game.finished_count, 1);
//! # Ok::<(), splitkeeper::SplitsError>(())
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::game::{Game, GameSplit};
use crate::types::{Micros, SplitInfo, UNSET, is_set, split_flags};
use crate::{Result, SplitsError};

/// Live measurements for one split.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SplitState {
    /// Cumulative time at this split
    pub time: Micros,
    /// `time` minus the game's reference time, 0 without a reference
    pub delta: Micros,
    /// Time spent in the segment ending at this split
    pub segment: Micros,
    /// `segment` minus the game's reference segment
    pub segment_delta: Micros,
    pub info: SplitInfo,
    pub best_time: Micros,
    pub best_segment: Micros,
}

impl SplitState {
    fn seeded(reference: &GameSplit) -> Self {
        Self {
            time: reference.time,
            segment: reference.segment,
            best_time: reference.best_time,
            best_segment: reference.best_segment,
            ..Default::default()
        }
    }

    /// Restore this split to the reference values, keeping its bests.
    fn rewind(&mut self, reference: &GameSplit) {
        self.time = reference.time;
        self.delta = 0;
        self.info.clear();
        self.segment = reference.segment;
        self.segment_delta = 0;
    }
}

/// Per-split results of a released timer.
///
/// Hand it to [`Game::update_bests`] to keep the bests of an unfinished run.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RunRecord {
    pub splits: Vec<SplitState>,
    /// Number of splits the run passed
    pub curr_split: usize,
}

/// Owned copy of every timer field, for presentation code.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TimerSnapshot {
    pub running: bool,
    pub started: bool,
    pub now: Micros,
    pub start_time: Micros,
    pub time: Micros,
    pub curr_split: usize,
    pub sum_of_bests: Micros,
    pub attempt_count: u32,
    pub finished_count: u32,
    pub splits: Vec<SplitState>,
}

/// One attempt in progress against a [`Game`].
#[derive(Debug)]
pub struct Timer<'g> {
    game: &'g mut Game,
    running: bool,
    started: bool,
    now: Micros,
    start_time: Micros,
    time: Micros,
    curr_split: usize,
    splits: Vec<SplitState>,
    sum_of_bests: Micros,
}

impl<'g> Timer<'g> {
    /// Bind a new timer to `game`, seeded from its current references and bests.
    pub fn new(game: &'g mut Game) -> Result<Self> {
        let count = game.split_count();
        let mut splits = Vec::new();
        splits
            .try_reserve_exact(count)
            .map_err(|_| SplitsError::out_of_memory("timer splits", count))?;
        splits.resize(count, SplitState::default());

        let mut timer = Self {
            game,
            running: false,
            started: false,
            now: 0,
            start_time: 0,
            time: 0,
            curr_split: 0,
            splits,
            sum_of_bests: UNSET,
        };
        timer.reseed();
        debug!(splits = count, "Timer created");
        Ok(timer)
    }

    /// Advance the clock to `now` (microseconds, monotonic).
    ///
    /// While running, the time since the previous `step` is added to the run and
    /// the pending split's time, deltas and `BEHIND_TIME`/`LOSING_TIME` flags are
    /// recomputed. The reference point moves to `now` whether or not the timer is
    /// running, so a paused timer does not count the pause when resumed. Hosts
    /// should keep calling `step` while stopped for the same reason.
    pub fn step(&mut self, now: Micros) {
        self.now = now;
        if self.running {
            self.time = self.time.saturating_add(now.saturating_sub(self.start_time));
            let index = self.curr_split;
            if index < self.splits.len() {
                let reference = &self.game.splits()[index];
                let previous = index.checked_sub(1).map(|i| self.splits[i]);
                let split = &mut self.splits[index];

                split.time = self.time;
                if is_set(reference.time) {
                    split.delta = split.time.saturating_sub(reference.time);
                }
                split.info.set(split_flags::BEHIND_TIME, split.delta > 0);

                let segment_start = match previous {
                    None => Some(0),
                    Some(previous) if is_set(previous.time) => Some(previous.time),
                    Some(_) => None,
                };
                if let Some(segment_start) = segment_start {
                    split.segment = split.time.saturating_sub(segment_start);
                    if is_set(reference.segment) {
                        split.segment_delta = split.segment.saturating_sub(reference.segment);
                    }
                }

                let losing = match previous {
                    Some(previous) => split.delta > previous.delta,
                    None => split.delta > 0,
                };
                split.info.set(split_flags::LOSING_TIME, losing);

                trace!(split = index, time = split.time, delta = split.delta, "Step");
            }
        }
        self.start_time = now;
    }

    /// Start or resume the run. Returns whether the timer is running.
    ///
    /// The first start of an attempt counts it in the game's attempt counter.
    pub fn start(&mut self) -> bool {
        if self.curr_split < self.splits.len() {
            if !self.started {
                self.game.attempt_count = self.game.attempt_count.saturating_add(1);
                self.started = true;
                debug!(attempt = self.game.attempt_count, "Attempt started");
            }
            self.running = true;
        }
        self.running
    }

    /// Record the pending split. Returns the new `curr_split`, or 0 when the timer
    /// is not running, has not passed 0, or the run is already complete.
    ///
    /// Reaching the last split stops the timer, counts the run as finished and
    /// folds it into the game.
    ///
    /// The recorded time is whatever the last [`step`](Self::step) wrote to the
    /// pending split. Call `step` first, or the split keeps its seeded reference
    /// time.
    pub fn split(&mut self) -> usize {
        if !self.running || self.time <= 0 || self.curr_split >= self.splits.len() {
            return 0;
        }

        let index = self.curr_split;
        let split = &mut self.splits[index];
        if !is_set(split.best_time) || split.time < split.best_time {
            split.best_time = split.time;
            split.info.insert(split_flags::BEST_SPLIT);
        }
        if !is_set(split.best_segment) || split.segment < split.best_segment {
            split.best_segment = split.segment;
            split.info.insert(split_flags::BEST_SEGMENT);
        }
        debug!(split = index, time = split.time, delta = split.delta, "Split");

        self.sum_of_bests = sum_of_bests(&self.splits, self.game.splits());
        self.curr_split += 1;

        if self.curr_split == self.splits.len() {
            self.game.finished_count = self.game.finished_count.saturating_add(1);
            self.stop();
            self.game.update_splits(&self.splits, self.curr_split);
            debug!(time = self.time, finished = self.game.finished_count, "Run finished");
        }
        self.curr_split
    }

    /// Pass the pending split without recording a time. Returns the new
    /// `curr_split`, or 0 under the same preconditions as [`split`](Self::split).
    ///
    /// Bests and counters are untouched. Skipping the last split ends the run
    /// without finishing it: the timer keeps running and nothing is folded into
    /// the game.
    pub fn skip(&mut self) -> usize {
        if !self.running || self.time <= 0 || self.curr_split >= self.splits.len() {
            return 0;
        }
        let split = &mut self.splits[self.curr_split];
        split.time = UNSET;
        split.delta = 0;
        split.info.clear();
        split.segment = UNSET;
        split.segment_delta = 0;
        debug!(split = self.curr_split, "Skipped split");
        self.curr_split += 1;
        self.curr_split
    }

    /// Undo the last split or skip. Returns the new `curr_split` (0 when nothing
    /// was undone).
    ///
    /// Every split from the new `curr_split` onwards goes back to the game's
    /// reference values. Undoing the final split resumes the run.
    pub fn unsplit(&mut self) -> usize {
        if self.curr_split == 0 {
            return 0;
        }
        self.curr_split -= 1;
        let from = self.curr_split;
        for (split, reference) in self.splits.iter_mut().zip(self.game.splits()).skip(from) {
            split.rewind(reference);
        }
        if self.curr_split + 1 == self.splits.len() {
            self.running = true;
        }
        debug!(split = self.curr_split, running = self.running, "Unsplit");
        self.curr_split
    }

    /// Pause the run.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Clear the run and reseed from the game. Returns whether a reset happened.
    ///
    /// Does nothing while running. An attempt that was started but never got past
    /// zero is cancelled instead, so it does not count as an attempt.
    pub fn reset(&mut self) -> bool {
        if self.running {
            return false;
        }
        if self.started && self.time <= 0 {
            return self.cancel();
        }
        self.reseed();
        debug!("Timer reset");
        true
    }

    /// Clear the run and uncount the attempt. Returns whether a cancel happened.
    ///
    /// Does nothing while running.
    pub fn cancel(&mut self) -> bool {
        if self.running {
            return false;
        }
        if self.started {
            self.game.attempt_count = self.game.attempt_count.saturating_sub(1);
        }
        self.reseed();
        debug!(attempts = self.game.attempt_count, "Attempt cancelled");
        true
    }

    /// Copy the current run's state for presentation.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            running: self.running,
            started: self.started,
            now: self.now,
            start_time: self.start_time,
            time: self.time,
            curr_split: self.curr_split,
            sum_of_bests: self.sum_of_bests,
            attempt_count: self.game.attempt_count,
            finished_count: self.game.finished_count,
            splits: self.splits.clone(),
        }
    }

    /// End the binding and return the per-split results.
    pub fn release(self) -> RunRecord {
        RunRecord { splits: self.splits, curr_split: self.curr_split }
    }

    pub fn game(&self) -> &Game {
        &*self.game
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether every split has been passed.
    pub fn is_complete(&self) -> bool {
        self.curr_split == self.splits.len()
    }

    pub fn now(&self) -> Micros {
        self.now
    }

    pub fn start_time(&self) -> Micros {
        self.start_time
    }

    /// Elapsed run time; negative during the start delay countdown.
    pub fn time(&self) -> Micros {
        self.time
    }

    pub fn curr_split(&self) -> usize {
        self.curr_split
    }

    pub fn split_count(&self) -> usize {
        self.splits.len()
    }

    pub fn splits(&self) -> &[SplitState] {
        &self.splits
    }

    pub fn split_state(&self, index: usize) -> Option<&SplitState> {
        self.splits.get(index)
    }

    /// Sum of the best segments, or 0 while any split has no best segment.
    pub fn sum_of_bests(&self) -> Micros {
        self.sum_of_bests
    }

    pub fn attempt_count(&self) -> u32 {
        self.game.attempt_count
    }

    pub fn finished_count(&self) -> u32 {
        self.game.finished_count
    }

    fn reseed(&mut self) {
        self.started = false;
        self.start_time = 0;
        self.curr_split = 0;
        self.time = self.game.start_delay.saturating_neg();
        for (split, reference) in self.splits.iter_mut().zip(self.game.splits()) {
            *split = SplitState::seeded(reference);
        }
        self.sum_of_bests = sum_of_bests(&self.splits, self.game.splits());
    }
}

/// Sum of each split's best segment, falling back to the game's; 0 when a split
/// has neither.
fn sum_of_bests(splits: &[SplitState], reference: &[GameSplit]) -> Micros {
    let mut sum: Micros = 0;
    for (split, game_split) in splits.iter().zip(reference) {
        let best = if is_set(split.best_segment) {
            split.best_segment
        } else if is_set(game_split.best_segment) {
            game_split.best_segment
        } else {
            return UNSET;
        };
        sum = sum.saturating_add(best);
    }
    sum
}

#[cfg(test)]
mod tests;
