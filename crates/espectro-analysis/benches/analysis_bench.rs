//! Benchmarks for the per-frame analysis path.
//!
//! The whole snapshot → bars → tracker cycle runs once per display frame
//! (~60 Hz) while audio plays, so it has to stay far below the frame budget.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use espectro_analysis::{AnalysisTap, DominantTracker, map_to_bars};
use std::f32::consts::PI;

fn tone_block(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.1 * (2.0 * PI * freq * i as f32 / sample_rate).sin())
        .collect()
}

fn bench_snapshot(c: &mut Criterion) {
    let mut tap = AnalysisTap::new(48000.0);
    tap.push_block(&tone_block(440.0, 48000.0, 4096));

    c.bench_function("tap_snapshot_4096", |b| {
        b.iter(|| black_box(tap.snapshot()))
    });
}

fn bench_map_to_bars(c: &mut Criterion) {
    let mut tap = AnalysisTap::new(48000.0);
    tap.push_block(&tone_block(440.0, 48000.0, 4096));
    let snapshot = tap.snapshot();

    c.bench_function("map_to_bars_120", |b| {
        b.iter(|| black_box(map_to_bars(black_box(&snapshot), 120, 20.0, 8000.0)))
    });
}

fn bench_frame_cycle(c: &mut Criterion) {
    let mut tap = AnalysisTap::new(48000.0);
    let block = tone_block(440.0, 48000.0, 800);
    let mut tracker = DominantTracker::new();
    let mut time = 0.0f32;

    c.bench_function("full_frame_cycle", |b| {
        b.iter(|| {
            tap.push_block(&block);
            let snapshot = tap.snapshot();
            let mut bars = map_to_bars(&snapshot, 120, 20.0, 8000.0);
            let entry = tracker.update(&mut bars, time);
            time += 1.0 / 60.0;
            black_box(entry)
        })
    });
}

criterion_group!(benches, bench_snapshot, bench_map_to_bars, bench_frame_cycle);
criterion_main!(benches);
