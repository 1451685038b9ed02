//! Offline timeline extraction.
//!
//! Runs the same cascade → tap → tracker pipeline as live playback, but
//! clocked by a simulated frame rate instead of the audio device, so a
//! whole track's dominant-frequency timeline drops out in seconds.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;

use espectro_analysis::bars::{DEFAULT_BAR_COUNT, DEFAULT_MAX_FREQ, DEFAULT_MIN_FREQ};
use espectro_analysis::tracker::DEFAULT_TOP_K;
use espectro_analysis::{AnalysisTap, DominantTracker, TimelineEntry, map_to_bars};
use espectro_config::BandLayout;
use espectro_core::{Effect, FilterChain, frequency_to_note};
use espectro_io::decode_audio;

use crate::render::{describe_frequency, format_time};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Audio file to analyze
    input: PathBuf,

    /// Equalizer preset applied before analysis
    #[arg(short, long)]
    preset: Option<String>,

    /// Band gain override, e.g. "mid=6" (repeatable)
    #[arg(long = "gain", value_parser = super::parse_band_gain)]
    gains: Vec<(String, f32)>,

    /// Emit the timeline as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Simulated display frame rate
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Minimum spacing between timeline entries, in seconds
    #[arg(long, default_value = "0.5")]
    spacing: f32,
}

/// One timeline row of the JSON output.
#[derive(Serialize)]
struct TimelineRow {
    time_seconds: f32,
    frequencies: Vec<FrequencyRow>,
}

/// One dominant frequency with its note name.
#[derive(Serialize)]
struct FrequencyRow {
    frequency_hz: f32,
    note: Option<String>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let audio = decode_audio(&args.input)?;
    let sample_rate = audio.sample_rate as f32;
    let duration = audio.duration_seconds();

    let layout = BandLayout::five_band();
    let gains = super::resolve_gains(&layout, args.preset.as_deref(), &args.gains)?;

    let mut chain = FilterChain::new(sample_rate);
    chain.configure(&layout.to_specs(&gains)?)?;
    let mut tap = AnalysisTap::new(sample_rate);
    let mut tracker = DominantTracker::with_config(args.spacing, DEFAULT_TOP_K);

    let samples_per_frame = (sample_rate / args.fps as f32).max(1.0) as usize;
    let total_frames = audio.samples.len().div_ceil(samples_per_frame);

    if !args.json {
        println!(
            "Analyzing {} ({:.1}s at {} Hz, {} frames)...",
            args.input.display(),
            duration,
            audio.sample_rate,
            total_frames,
        );
    }

    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut block = vec![0.0f32; samples_per_frame];
    let mut timeline: Vec<TimelineEntry> = Vec::new();

    for (frame_idx, input) in audio.samples.chunks(samples_per_frame).enumerate() {
        let time = frame_idx as f32 / args.fps as f32;

        let len = input.len();
        chain.process_block(input, &mut block[..len]);
        tap.push_block(&block[..len]);

        let snapshot = tap.snapshot();
        let mut bars = map_to_bars(
            &snapshot,
            DEFAULT_BAR_COUNT,
            DEFAULT_MIN_FREQ,
            DEFAULT_MAX_FREQ,
        );
        if let Some(entry) = tracker.update(&mut bars, time) {
            timeline.push(entry);
        }

        pb.set_position(frame_idx as u64 + 1);
    }

    pb.finish_and_clear();

    if args.json {
        let rows: Vec<TimelineRow> = timeline
            .iter()
            .map(|entry| TimelineRow {
                time_seconds: entry.time_seconds,
                frequencies: entry
                    .frequencies_hz
                    .iter()
                    .map(|&f| FrequencyRow {
                        frequency_hz: f,
                        note: frequency_to_note(f).map(|l| l.to_string()).ok(),
                    })
                    .collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{} timeline entries:", timeline.len());
        for entry in &timeline {
            let notes = entry
                .frequencies_hz
                .iter()
                .map(|&f| describe_frequency(f))
                .collect::<Vec<_>>()
                .join(" · ");
            println!("{:>8}  {notes}", format_time(entry.time_seconds));
        }
    }

    Ok(())
}
