//! Playback transport: the bridge between decoded audio, the filter
//! cascade, and the output stream.
//!
//! A [`Player`] owns one decoded track for its whole lifetime. Changing
//! tracks means dropping the player and building a new one, which is what
//! tears down and rewires the processing graph. Within one track's
//! lifetime, only filter parameters ever change.
//!
//! All shared state is either atomic (cursor, playing flag, volume) or
//! behind a mutex locked briefly from both sides (the cascade and the tap),
//! so the UI thread can reconfigure bands mid-playback while the audio
//! callback keeps running.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use espectro_analysis::{AnalysisTap, SpectrumSnapshot};
use espectro_core::{BandSpec, ChainError, Effect, FilterChain};

use crate::decode::AudioData;

/// Playback transport over one decoded track.
///
/// Cloning is cheap and shares all state; the output-stream callback holds
/// one clone, the UI another.
#[derive(Debug, Clone)]
pub struct Player {
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
    cursor: Arc<AtomicUsize>,
    playing: Arc<AtomicBool>,
    /// Volume in `[0, 1]`, stored as f32 bits.
    volume_bits: Arc<AtomicU32>,
    chain: Arc<Mutex<FilterChain>>,
    tap: Arc<Mutex<AnalysisTap>>,
}

impl Player {
    /// Build the playback graph for a decoded track.
    ///
    /// The filter cascade starts unbuilt; the first
    /// [`configure_bands`](Self::configure_bands) call wires it.
    pub fn new(audio: AudioData) -> Self {
        let sample_rate = audio.sample_rate;
        Self {
            samples: Arc::new(audio.samples),
            sample_rate,
            cursor: Arc::new(AtomicUsize::new(0)),
            playing: Arc::new(AtomicBool::new(false)),
            volume_bits: Arc::new(AtomicU32::new(0.7f32.to_bits())),
            chain: Arc::new(Mutex::new(FilterChain::new(sample_rate as f32))),
            tap: Arc::new(Mutex::new(AnalysisTap::new(sample_rate as f32))),
        }
    }

    /// Sample rate of the loaded track, in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Track duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Current playback position in seconds.
    pub fn position_seconds(&self) -> f32 {
        self.cursor.load(Ordering::Acquire) as f32 / self.sample_rate as f32
    }

    /// Whether playback has reached the end of the track.
    pub fn at_end(&self) -> bool {
        self.cursor.load(Ordering::Acquire) >= self.samples.len()
    }

    /// Start playback from the current position.
    pub fn play(&self) {
        self.playing.store(true, Ordering::Release);
    }

    /// Pause playback, keeping the position.
    pub fn pause(&self) {
        self.playing.store(false, Ordering::Release);
    }

    /// Toggle between playing and paused.
    pub fn toggle(&self) {
        self.playing.fetch_xor(true, Ordering::AcqRel);
    }

    /// Whether the transport is currently playing.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Jump to a position in seconds, clamped to the track bounds.
    pub fn seek(&self, seconds: f32) {
        let sample = (seconds.max(0.0) * self.sample_rate as f32) as usize;
        self.cursor
            .store(sample.min(self.samples.len()), Ordering::Release);
    }

    /// Seek relative to the current position.
    pub fn seek_by(&self, delta_seconds: f32) {
        self.seek(self.position_seconds() + delta_seconds);
    }

    /// Set output volume in `[0, 1]`.
    pub fn set_volume(&self, volume: f32) {
        self.volume_bits
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Release);
    }

    /// Current output volume.
    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Acquire))
    }

    /// Build or update the filter cascade.
    ///
    /// Safe to call mid-playback: an update rewrites coefficients in place
    /// and never reconnects anything.
    pub fn configure_bands(&self, specs: &[BandSpec]) -> Result<(), ChainError> {
        self.lock_chain().configure(specs)
    }

    /// Retarget one band's gain.
    pub fn set_band_gain(&self, id: &str, gain_db: f32) -> Result<(), ChainError> {
        self.lock_chain().set_gain(id, gain_db)
    }

    /// Current gain target of a band, if the cascade has it.
    pub fn band_gain(&self, id: &str) -> Option<f32> {
        self.lock_chain().gain_db(id)
    }

    /// Take a spectrum snapshot from the analysis tap.
    pub fn snapshot(&self) -> SpectrumSnapshot {
        self.tap
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Fill an interleaved output buffer; this is the body of the
    /// output-stream callback.
    ///
    /// Advances the cursor, runs the cascade, feeds the analysis tap, then
    /// applies volume. Paused (or finished) playback writes silence and
    /// leaves everything untouched.
    pub fn fill(&self, output: &mut [f32], channels: usize) {
        if !self.is_playing() {
            output.fill(0.0);
            return;
        }

        let frames = output.len() / channels.max(1);
        let cursor = self.cursor.load(Ordering::Acquire);
        let end = (cursor + frames).min(self.samples.len());

        let mut block: Vec<f32> = self.samples[cursor..end].to_vec();
        {
            let mut chain = self.lock_chain();
            chain.process_block_inplace(&mut block);
        }
        {
            let mut tap = self.tap.lock().unwrap_or_else(PoisonError::into_inner);
            tap.push_block(&block);
        }

        let volume = self.volume();
        for (i, frame) in output.chunks_mut(channels.max(1)).enumerate() {
            let sample = block.get(i).copied().unwrap_or(0.0) * volume;
            frame.fill(sample);
        }

        self.cursor.store(end, Ordering::Release);
        if end >= self.samples.len() {
            // Track finished: stop so the UI sees the transport go idle
            self.playing.store(false, Ordering::Release);
        }
    }

    fn lock_chain(&self) -> std::sync::MutexGuard<'_, FilterChain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
