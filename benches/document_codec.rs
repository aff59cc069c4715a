//! Benchmarks for splits document load and save
//!
//! Platform: Cross-platform (bundled fixtures and temp files, CI-safe)

use criterion::{Criterion, criterion_group, criterion_main};
use splitkeeper::test_utils::{game_with_times, require_splits_fixture};
use std::hint::black_box;

fn bench_load(c: &mut Criterion) {
    let json = require_splits_fixture("three_splits.json").expect("bundled fixture");
    let yaml = require_splits_fixture("three_splits.yaml").expect("bundled fixture");

    let mut group = c.benchmark_group("document_load");
    group.bench_function("json", |b| {
        b.iter(|| black_box(splitkeeper::load(black_box(&json)).expect("loading fixture")))
    });
    group.bench_function("yaml", |b| {
        b.iter(|| black_box(splitkeeper::load(black_box(&yaml)).expect("loading fixture")))
    });
    group.finish();
}

fn bench_save(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("creating temp dir");
    let times: Vec<i64> = (1..=200).map(|i| i * 45_000_000).collect();
    let mut game = game_with_times(&times);
    game.path = dir.path().join("long-run.json");

    c.bench_function("document_save_200_splits", |b| {
        b.iter(|| splitkeeper::save(black_box(&game)).expect("saving game"))
    });
}

criterion_group!(benches, bench_load, bench_save);
criterion_main!(benches);
