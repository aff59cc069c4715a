//! Timer state machine tests

use super::*;
use crate::test_utils::{empty_game, game_with_times};
use proptest::prelude::*;

const SECOND: Micros = 1_000_000;

fn reference_game() -> Game {
    game_with_times(&[10 * SECOND, 25 * SECOND, 40 * SECOND])
}

/// Start at t=0 and split at each of `split_times`.
fn run_splits(timer: &mut Timer<'_>, split_times: &[Micros]) {
    timer.step(0);
    timer.start();
    for &now in split_times {
        timer.step(now);
        timer.split();
    }
}

fn without_flags(splits: &[SplitState]) -> Vec<SplitState> {
    splits.iter().map(|split| SplitState { info: SplitInfo::default(), ..*split }).collect()
}

#[test]
fn first_split_ahead_of_reference() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();

    timer.step(0);
    assert!(timer.start());
    timer.step(5 * SECOND);
    assert_eq!(timer.split(), 1);

    let first = timer.splits()[0];
    assert_eq!(first.delta, -5 * SECOND);
    assert!(!first.info.is_losing());
    assert!(!first.info.is_behind());
    assert!(first.info.is_best_split());
    assert!(first.info.is_best_segment());
}

#[test]
fn completing_a_run_folds_into_the_game() {
    let mut game = reference_game();
    {
        let mut timer = Timer::new(&mut game).unwrap();
        run_splits(&mut timer, &[5 * SECOND, 20 * SECOND]);
        assert_eq!(timer.finished_count(), 0);

        timer.step(35 * SECOND);
        assert_eq!(timer.split(), 3);
        assert!(timer.is_complete());
        assert!(!timer.is_running());
        assert_eq!(timer.finished_count(), 1);
    }
    assert_eq!(game.attempt_count, 1);
    assert_eq!(game.finished_count, 1);
    assert_eq!(game.world_record, 35 * SECOND);
    assert_eq!(game.reference_time(), 35 * SECOND);
    assert_eq!(game.splits()[1].best_segment, 15 * SECOND);
}

#[test]
fn start_counts_each_attempt_once() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();

    assert!(timer.start());
    timer.stop();
    assert!(timer.start());
    assert_eq!(timer.attempt_count(), 1);
    assert!(timer.is_started());
}

#[test]
fn start_after_completion_is_a_no_op() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    run_splits(&mut timer, &[5 * SECOND, 20 * SECOND, 35 * SECOND]);

    assert!(!timer.start());
    assert_eq!(timer.attempt_count(), 1);
}

#[test]
fn game_without_splits_never_starts() {
    let mut game = empty_game(0);
    let mut timer = Timer::new(&mut game).unwrap();
    assert!(!timer.start());
    assert!(timer.is_complete());
    assert_eq!(timer.split(), 0);
    assert_eq!(timer.attempt_count(), 0);
}

#[test]
fn split_requires_running_and_positive_time() {
    let mut game = reference_game();
    game.start_delay = 3 * SECOND;
    let mut timer = Timer::new(&mut game).unwrap();
    assert_eq!(timer.time(), -3 * SECOND);

    // Not running
    timer.step(SECOND);
    assert_eq!(timer.split(), 0);

    timer.start();
    timer.step(2 * SECOND);
    assert_eq!(timer.time(), -2 * SECOND);
    assert_eq!(timer.split(), 0);
    assert_eq!(timer.skip(), 0);

    timer.step(5 * SECOND);
    assert_eq!(timer.time(), SECOND);
    assert_eq!(timer.split(), 1);
}

#[test]
fn paused_time_is_not_counted() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    timer.step(0);
    timer.start();
    timer.step(4 * SECOND);
    timer.stop();

    timer.step(60 * SECOND);
    assert_eq!(timer.time(), 4 * SECOND);

    timer.start();
    timer.step(61 * SECOND);
    assert_eq!(timer.time(), 5 * SECOND);
    assert_eq!(timer.splits()[0].time, 5 * SECOND);
    assert_eq!(timer.start_time(), 61 * SECOND);
    assert_eq!(timer.now(), 61 * SECOND);
}

#[test]
fn behind_and_losing_flags_track_deltas() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    timer.step(0);
    timer.start();

    timer.step(12 * SECOND);
    let first = timer.splits()[0];
    assert_eq!(first.delta, 2 * SECOND);
    assert!(first.info.is_behind());
    assert!(first.info.is_losing());
    timer.split();
    assert!(!timer.splits()[0].info.is_best_split());

    // Still behind, but gaining on the previous split
    timer.step(26 * SECOND);
    let second = timer.splits()[1];
    assert_eq!(second.delta, SECOND);
    assert_eq!(second.segment, 14 * SECOND);
    assert_eq!(second.segment_delta, -SECOND);
    assert!(second.info.is_behind());
    assert!(!second.info.is_losing());

    timer.step(28 * SECOND);
    assert!(timer.splits()[1].info.is_losing());
}

#[test]
fn deltas_stay_zero_without_reference() {
    let mut game = empty_game(2);
    let mut timer = Timer::new(&mut game).unwrap();
    timer.step(0);
    timer.start();
    timer.step(7 * SECOND);

    let first = timer.splits()[0];
    assert_eq!(first.time, 7 * SECOND);
    assert_eq!(first.segment, 7 * SECOND);
    assert_eq!(first.delta, 0);
    assert_eq!(first.segment_delta, 0);
    assert!(!first.info.is_behind());
}

#[test]
fn skipping_the_last_split_is_not_a_finish() {
    let mut game = reference_game();
    {
        let mut timer = Timer::new(&mut game).unwrap();
        run_splits(&mut timer, &[9 * SECOND, 24 * SECOND]);
        timer.step(38 * SECOND);
        assert_eq!(timer.skip(), 3);

        assert_eq!(timer.curr_split(), timer.split_count());
        let last = timer.splits()[2];
        assert_eq!(last.time, UNSET);
        assert_eq!(last.segment, UNSET);
        assert_eq!(last.delta, 0);
        assert_eq!(last.info, SplitInfo::default());
        assert_eq!(timer.finished_count(), 0);
        assert_eq!(timer.skip(), 0);
    }
    assert_eq!(game.world_record, UNSET);
    assert_eq!(game.reference_time(), 40 * SECOND);
}

#[test]
fn segment_after_skip_is_not_measured() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    timer.step(0);
    timer.start();
    timer.step(9 * SECOND);
    timer.skip();

    timer.step(23 * SECOND);
    let second = timer.splits()[1];
    assert_eq!(second.time, 23 * SECOND);
    assert_eq!(second.delta, -2 * SECOND);
    // Reference segment left in place
    assert_eq!(second.segment, 15 * SECOND);
    assert_eq!(second.segment_delta, 0);
}

#[test]
fn unsplit_rewinds_to_reference_values() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    assert_eq!(timer.unsplit(), 0);

    run_splits(&mut timer, &[9 * SECOND, 26 * SECOND]);
    assert_eq!(timer.unsplit(), 1);

    let second = timer.splits()[1];
    assert_eq!(second.time, 25 * SECOND);
    assert_eq!(second.segment, 15 * SECOND);
    assert_eq!(second.delta, 0);
    assert_eq!(second.info, SplitInfo::default());
    // Earlier splits keep their measurements
    assert_eq!(timer.splits()[0].time, 9 * SECOND);
    assert!(timer.is_running());
}

#[test]
fn unsplit_after_finish_resumes_the_run() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    run_splits(&mut timer, &[9 * SECOND, 24 * SECOND, 39 * SECOND]);
    assert!(!timer.is_running());

    assert_eq!(timer.unsplit(), 2);
    assert!(timer.is_running());
    assert_eq!(timer.finished_count(), 1);

    timer.step(41 * SECOND);
    assert_eq!(timer.splits()[2].time, 41 * SECOND);
}

#[test]
fn reset_is_refused_while_running() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    timer.start();
    assert!(!timer.reset());
    assert!(!timer.cancel());
    assert!(timer.is_started());
}

#[test]
fn reset_without_elapsed_time_cancels_the_attempt() {
    let mut game = reference_game();
    game.attempt_count = 7;
    let mut timer = Timer::new(&mut game).unwrap();
    timer.step(0);
    timer.start();
    assert_eq!(timer.attempt_count(), 8);
    timer.stop();

    assert!(timer.reset());
    assert_eq!(timer.attempt_count(), 7);
    assert!(!timer.is_started());
}

#[test]
fn reset_after_elapsed_time_keeps_the_attempt() {
    let mut game = reference_game();
    game.attempt_count = 7;
    let mut timer = Timer::new(&mut game).unwrap();
    run_splits(&mut timer, &[9 * SECOND]);
    timer.stop();

    assert!(timer.reset());
    assert_eq!(timer.attempt_count(), 8);
    assert_eq!(timer.curr_split(), 0);
    assert_eq!(timer.time(), 0);
    assert_eq!(timer.splits()[0].time, 10 * SECOND);
    assert_eq!(timer.splits()[0].info, SplitInfo::default());
    // The run's new best is dropped; the game still holds the old one
    assert_eq!(timer.splits()[0].best_time, 10 * SECOND);
}

#[test]
fn cancel_only_uncounts_started_attempts() {
    let mut game = reference_game();
    game.attempt_count = 2;
    let mut timer = Timer::new(&mut game).unwrap();

    assert!(timer.cancel());
    assert_eq!(timer.attempt_count(), 2);

    run_splits(&mut timer, &[9 * SECOND]);
    timer.stop();
    assert!(timer.cancel());
    assert_eq!(timer.attempt_count(), 2);
}

#[test]
fn reset_restores_the_start_delay() {
    let mut game = reference_game();
    game.start_delay = 5 * SECOND;
    let mut timer = Timer::new(&mut game).unwrap();
    timer.step(0);
    timer.start();
    timer.step(20 * SECOND);
    timer.stop();

    assert!(timer.reset());
    assert_eq!(timer.time(), -5 * SECOND);
}

#[test]
fn sum_of_bests_requires_every_segment() {
    let mut game = empty_game(2);
    {
        let mut timer = Timer::new(&mut game).unwrap();
        assert_eq!(timer.sum_of_bests(), UNSET);

        timer.step(0);
        timer.start();
        timer.step(6 * SECOND);
        timer.split();
        assert_eq!(timer.sum_of_bests(), UNSET);

        timer.step(10 * SECOND);
        timer.split();
        assert_eq!(timer.sum_of_bests(), 10 * SECOND);
    }

    let timer = Timer::new(&mut game).unwrap();
    assert_eq!(timer.sum_of_bests(), 10 * SECOND);
}

#[test]
fn sum_of_bests_picks_up_new_golds() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    assert_eq!(timer.sum_of_bests(), 40 * SECOND);

    run_splits(&mut timer, &[8 * SECOND]);
    assert_eq!(timer.sum_of_bests(), 38 * SECOND);
}

#[test]
fn released_run_can_save_bests() {
    let mut game = reference_game();
    let record = {
        let mut timer = Timer::new(&mut game).unwrap();
        run_splits(&mut timer, &[8 * SECOND]);
        timer.step(30 * SECOND);
        timer.stop();
        timer.release()
    };
    assert_eq!(record.curr_split, 1);

    game.update_bests(&record);
    assert_eq!(game.splits()[0].best_time, 8 * SECOND);
    assert_eq!(game.splits()[0].best_segment, 8 * SECOND);
    assert_eq!(game.splits()[1].best_time, 25 * SECOND);
    // Reference run untouched
    assert_eq!(game.splits()[0].time, 10 * SECOND);
}

#[test]
fn snapshot_mirrors_the_timer() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    run_splits(&mut timer, &[9 * SECOND]);
    timer.step(11 * SECOND);

    let snapshot = timer.snapshot();
    assert!(snapshot.running && snapshot.started);
    assert_eq!(snapshot.curr_split, 1);
    assert_eq!(snapshot.time, 11 * SECOND);
    assert_eq!(snapshot.attempt_count, 1);
    assert_eq!(snapshot.splits, timer.splits());
    assert_eq!(snapshot.sum_of_bests, timer.sum_of_bests());
}

#[test]
fn split_without_step_records_the_seeded_time() {
    let mut game = reference_game();
    let mut timer = Timer::new(&mut game).unwrap();
    run_splits(&mut timer, &[5 * SECOND]);

    // No step since the first split: the second still holds its reference time
    assert_eq!(timer.split(), 2);
    assert_eq!(timer.splits()[1].time, 25 * SECOND);
    assert_eq!(timer.splits()[1].delta, 0);
}

#[test]
fn extreme_clock_values_saturate() {
    let mut game = reference_game();
    game.start_delay = Micros::MIN;
    let mut timer = Timer::new(&mut game).unwrap();
    assert_eq!(timer.time(), Micros::MAX);

    timer.step(Micros::MIN);
    timer.start();
    timer.step(Micros::MAX);
    assert_eq!(timer.time(), Micros::MAX);

    let first = timer.splits()[0];
    assert_eq!(first.time, Micros::MAX);
    assert_eq!(first.delta, Micros::MAX - 10 * SECOND);
    assert_eq!(first.segment_delta, Micros::MAX - 10 * SECOND);
}

#[test]
fn game_outlives_many_timers() {
    let mut game = reference_game();
    for attempt in 1..=3 {
        let mut timer = Timer::new(&mut game).unwrap();
        run_splits(&mut timer, &[9 * SECOND]);
        timer.stop();
        timer.reset();
        assert_eq!(timer.attempt_count(), attempt);
    }
    assert_eq!(game.attempt_count, 3);
    assert_eq!(game.finished_count, 0);
}

proptest! {
    #[test]
    fn prop_unsplit_then_split_restores_state(
        first in 1i64..10_000_000,
        second in 1i64..10_000_000,
    ) {
        let mut game = reference_game();
        let mut timer = Timer::new(&mut game).unwrap();
        timer.step(0);
        timer.start();
        timer.step(first);
        timer.split();
        let now = first + second;
        timer.step(now);
        timer.split();

        let before = timer.snapshot();
        prop_assert_eq!(timer.unsplit(), 1);
        timer.step(now);
        prop_assert_eq!(timer.split(), 2);
        let after = timer.snapshot();

        prop_assert_eq!(without_flags(&before.splits), without_flags(&after.splits));
        prop_assert_eq!(before.curr_split, after.curr_split);
        prop_assert_eq!(before.time, after.time);
        prop_assert_eq!(before.sum_of_bests, after.sum_of_bests);
        prop_assert_eq!(before.running, after.running);
        prop_assert_eq!(before.attempt_count, after.attempt_count);
    }

    #[test]
    fn prop_bests_never_increase_across_attempts(
        attempts in prop::collection::vec(prop::collection::vec(1i64..20_000_000, 3), 1..6),
    ) {
        let mut game = empty_game(3);
        for segments in attempts {
            let before: Vec<GameSplit> = game.splits().to_vec();
            {
                let mut timer = Timer::new(&mut game).unwrap();
                timer.step(0);
                timer.start();
                let mut now = 0;
                for segment in &segments {
                    now += segment;
                    timer.step(now);
                    timer.split();
                }
                prop_assert!(timer.is_complete());
            }
            for (old, new) in before.iter().zip(game.splits()) {
                prop_assert!(new.best_time != UNSET && new.best_segment != UNSET);
                if old.best_time != UNSET {
                    prop_assert!(new.best_time <= old.best_time);
                }
                if old.best_segment != UNSET {
                    prop_assert!(new.best_segment <= old.best_segment);
                }
            }
        }
    }

    #[test]
    fn prop_sum_of_bests_zero_iff_a_segment_is_unknown(
        bests in prop::collection::vec(prop_oneof![Just(0i64), 1i64..5_000_000], 1..8),
    ) {
        let mut game = empty_game(bests.len());
        for (split, best) in game.splits_mut().iter_mut().zip(&bests) {
            split.best_segment = *best;
        }
        let timer = Timer::new(&mut game).unwrap();
        let any_unknown = bests.iter().any(|best| *best == UNSET);
        prop_assert_eq!(timer.sum_of_bests() == UNSET, any_unknown);
        if !any_unknown {
            prop_assert_eq!(timer.sum_of_bests(), bests.iter().sum::<i64>());
        }
    }
}
