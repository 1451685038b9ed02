//! Integration tests for the full analysis pipeline: signal in, spectrum
//! bars and timeline entries out.

use std::f32::consts::PI;

use espectro_analysis::bars::{DEFAULT_BAR_COUNT, DEFAULT_MAX_FREQ, DEFAULT_MIN_FREQ};
use espectro_analysis::{AnalysisTap, DominantTracker, map_to_bars};

const SAMPLE_RATE: f32 = 48000.0;

fn tone(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

fn mix(parts: &[(f32, f32)], len: usize) -> Vec<f32> {
    let mut out = vec![0.0; len];
    for &(freq, amplitude) in parts {
        for (i, sample) in out.iter_mut().enumerate() {
            *sample += amplitude * (2.0 * PI * freq * i as f32 / SAMPLE_RATE).sin();
        }
    }
    out
}

#[test]
fn tone_dominates_near_its_frequency() {
    let mut tap = AnalysisTap::new(SAMPLE_RATE);
    let mut tracker = DominantTracker::new();

    tap.push_block(&tone(440.0, 0.05, 4096));
    let snapshot = tap.snapshot();
    let mut bars = map_to_bars(&snapshot, DEFAULT_BAR_COUNT, DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ);

    let entry = tracker.update(&mut bars, 0.0).expect("tone should emit");
    let strongest = entry.frequencies_hz[0];

    // Bar bucketing is ~5% wide at this range; the strongest frequency
    // must land within one bucket of the tone
    assert!(
        (strongest / 440.0).ln().abs() < 0.06,
        "strongest frequency {} not near 440 Hz",
        strongest
    );
}

#[test]
fn two_tones_both_reported() {
    let mut tap = AnalysisTap::new(SAMPLE_RATE);
    let mut tracker = DominantTracker::new();

    // Bin-centered tones (bins 18 and 152 at 48 kHz / 4096) keep leakage
    // narrow enough that each tone lights exactly one display bar
    let low = 18.0 * SAMPLE_RATE / 4096.0;
    let high = 152.0 * SAMPLE_RATE / 4096.0;
    tap.push_block(&mix(&[(low, 0.05), (high, 0.05)], 4096));
    let snapshot = tap.snapshot();
    let mut bars = map_to_bars(&snapshot, DEFAULT_BAR_COUNT, DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ);

    let entry = tracker.update(&mut bars, 0.0).expect("tones should emit");
    let near = |target: f32| {
        entry
            .frequencies_hz
            .iter()
            .any(|&f| (f / target).ln().abs() < 0.1)
    };

    assert!(near(low), "{low} Hz missing from {:?}", entry.frequencies_hz);
    assert!(near(high), "{high} Hz missing from {:?}", entry.frequencies_hz);
}

#[test]
fn timeline_respects_spacing_across_playback() {
    let mut tap = AnalysisTap::new(SAMPLE_RATE);
    let mut tracker = DominantTracker::new();
    let mut timeline = Vec::new();

    // 5 seconds of playback at 60 fps, audio arriving in 800-sample blocks
    for frame in 0..300 {
        let time = frame as f32 / 60.0;
        tap.push_block(&tone(660.0, 0.05, 800));

        let snapshot = tap.snapshot();
        let mut bars =
            map_to_bars(&snapshot, DEFAULT_BAR_COUNT, DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ);
        if let Some(entry) = tracker.update(&mut bars, time) {
            timeline.push(entry);
        }
    }

    // ~1 entry per 0.5 s over 5 s
    assert!(
        (8..=11).contains(&timeline.len()),
        "expected ~10 entries, got {}",
        timeline.len()
    );
    for pair in timeline.windows(2) {
        assert!(pair[1].time_seconds > pair[0].time_seconds);
        assert!(pair[1].time_seconds - pair[0].time_seconds >= 0.5 - 1e-6);
    }
    for entry in &timeline {
        assert!(entry.frequencies_hz.len() <= 3);
        assert!(entry.frequencies_hz.iter().all(|&f| f > 0.0));
    }
}

#[test]
fn new_file_reset_clears_everything() {
    let mut tap = AnalysisTap::new(SAMPLE_RATE);
    let mut tracker = DominantTracker::new();
    let mut timeline = Vec::new();

    tap.push_block(&tone(330.0, 0.05, 4096));
    let snapshot = tap.snapshot();
    let mut bars = map_to_bars(&snapshot, DEFAULT_BAR_COUNT, DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ);
    if let Some(entry) = tracker.update(&mut bars, 42.0) {
        timeline.push(entry);
    }
    assert!(!timeline.is_empty());
    assert!(tracker.is_armed());

    // Loading a new file: tap reset, tracker reset, timeline cleared,
    // regardless of prior playback position
    use espectro_core::Effect;
    tap.reset();
    tracker.reset();
    timeline.clear();

    assert!(timeline.is_empty());
    assert!(!tracker.is_armed());

    let snapshot = tap.snapshot();
    assert!(snapshot.magnitudes.iter().all(|&m| m == 0));

    // First frame of the new file emits immediately even at time zero
    tap.push_block(&tone(523.25, 0.05, 4096));
    let snapshot = tap.snapshot();
    let mut bars = map_to_bars(&snapshot, DEFAULT_BAR_COUNT, DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ);
    assert!(tracker.update(&mut bars, 0.0).is_some());
}

#[test]
fn pipeline_is_deterministic() {
    let run = || {
        let mut tap = AnalysisTap::new(SAMPLE_RATE);
        let mut tracker = DominantTracker::new();
        tap.push_block(&mix(&[(110.0, 0.03), (550.0, 0.05), (2200.0, 0.02)], 4096));
        let snapshot = tap.snapshot();
        let mut bars =
            map_to_bars(&snapshot, DEFAULT_BAR_COUNT, DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ);
        tracker.update(&mut bars, 1.0)
    };
    assert_eq!(run(), run());
}
