//! The analysis tap: a pass-through stage that snapshots the spectrum.
//!
//! An [`AnalysisTap`] sits at the end of the filter cascade. As audio flows
//! through it unchanged, it keeps the most recent FFT window of samples in a
//! ring buffer; [`snapshot`](AnalysisTap::snapshot) turns that window into a
//! byte-quantized magnitude spectrum.
//!
//! Magnitudes are smoothed across snapshots with a fixed exponential moving
//! average (`s[k] = smoothing * s[k] + (1 - smoothing) * raw[k]`) before
//! quantization, so successive frames decay gracefully rather than
//! flickering. The dB window mapped onto the 0..=255 byte range is
//! [-100, -30] dB, the conventional display dynamic range for byte
//! frequency data.

use espectro_core::Effect;

use crate::fft::{Fft, Window};

/// Default FFT resolution for the spectrum display.
pub const DEFAULT_FFT_SIZE: usize = 4096;

/// Default exponential smoothing constant applied between snapshots.
pub const DEFAULT_SMOOTHING: f32 = 0.85;

/// Quietest magnitude represented in the byte scale, in dB.
const MIN_DB: f32 = -100.0;

/// Loudest magnitude represented in the byte scale, in dB.
const MAX_DB: f32 = -30.0;

/// One frame's magnitude-per-bin data.
///
/// Ephemeral: produced and consumed within one render tick, never persisted.
#[derive(Debug, Clone)]
pub struct SpectrumSnapshot {
    /// Sample rate of the signal the snapshot was taken from, in Hz.
    pub sample_rate_hz: f32,
    /// FFT size the magnitudes were computed at.
    pub fft_size: usize,
    /// Byte-quantized magnitudes, one per bin (`fft_size / 2` entries).
    pub magnitudes: Vec<u8>,
}

/// Pass-through analysis stage feeding the spectrum display.
#[derive(Debug)]
pub struct AnalysisTap {
    sample_rate: f32,
    fft_size: usize,
    smoothing: f32,
    fft: Fft,
    window: Vec<f32>,
    /// Most recent `fft_size` samples, written circularly.
    ring: Vec<f32>,
    write_pos: usize,
    /// Smoothed linear magnitudes carried between snapshots.
    smoothed: Vec<f32>,
}

impl AnalysisTap {
    /// Create a tap with the default FFT size and smoothing constant.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_config(sample_rate, DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING)
    }

    /// Create a tap with explicit FFT size (power of two) and smoothing
    /// constant in `[0, 1)`.
    pub fn with_config(sample_rate: f32, fft_size: usize, smoothing: f32) -> Self {
        debug_assert!(fft_size.is_power_of_two(), "FFT size must be a power of two");
        debug_assert!((0.0..1.0).contains(&smoothing));

        Self {
            sample_rate,
            fft_size,
            smoothing,
            fft: Fft::new(fft_size),
            window: Window::Hann.coefficients(fft_size),
            ring: vec![0.0; fft_size],
            write_pos: 0,
            smoothed: vec![0.0; fft_size / 2],
        }
    }

    /// FFT size of this tap.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Record a block of post-filter samples.
    pub fn push_block(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.ring[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % self.fft_size;
        }
    }

    /// Take a smoothed, byte-quantized spectrum of the most recent window.
    ///
    /// Deterministic: the same recorded samples and smoothing state always
    /// produce the same snapshot.
    pub fn snapshot(&mut self) -> SpectrumSnapshot {
        // Unroll the ring into time order, windowed
        let mut buffer = Vec::with_capacity(self.fft_size);
        for i in 0..self.fft_size {
            let pos = (self.write_pos + i) % self.fft_size;
            buffer.push(self.ring[pos] * self.window[i]);
        }

        let spectrum = self.fft.forward(&buffer);

        let scale = 1.0 / self.fft_size as f32;
        let mut magnitudes = Vec::with_capacity(self.fft_size / 2);
        for (k, bin) in spectrum[..self.fft_size / 2].iter().enumerate() {
            let raw = bin.norm() * scale;
            let s = self.smoothing * self.smoothed[k] + (1.0 - self.smoothing) * raw;
            self.smoothed[k] = s;

            let db = 20.0 * s.max(1e-10).log10();
            let normalized = (db - MIN_DB) / (MAX_DB - MIN_DB);
            magnitudes.push((normalized.clamp(0.0, 1.0) * 255.0) as u8);
        }

        SpectrumSnapshot {
            sample_rate_hz: self.sample_rate,
            fft_size: self.fft_size,
            magnitudes,
        }
    }
}

impl Effect for AnalysisTap {
    /// Record the sample and pass it through unchanged.
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.ring[self.write_pos] = input;
        self.write_pos = (self.write_pos + 1) % self.fft_size;
        input
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        self.push_block(input);
        output.copy_from_slice(input);
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.push_block(buffer);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Drop all recorded audio and smoothing history.
    fn reset(&mut self) {
        self.ring.fill(0.0);
        self.smoothed.fill(0.0);
        self.write_pos = 0;
    }
}
