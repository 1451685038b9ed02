//! Logarithmic frequency-to-bar mapping for the spectrum display.
//!
//! FFT bins are linearly spaced, but pitch perception is logarithmic:
//! linear bar spacing would over-represent high frequencies and compress
//! the musically dense low range into a few pixels. Bars are therefore
//! placed at `f_i = min * (max/min)^(i/barCount)`, and each bar reads the
//! FFT bin its frequency lands in.

use crate::tap::SpectrumSnapshot;

/// Default number of display bars, independent of FFT size.
pub const DEFAULT_BAR_COUNT: usize = 120;

/// Default lower edge of the display range, in Hz.
pub const DEFAULT_MIN_FREQ: f32 = 20.0;

/// Default upper edge of the display range, in Hz.
pub const DEFAULT_MAX_FREQ: f32 = 8000.0;

/// One bar of the spectrum display, derived per frame from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBar {
    /// Bucketed frequency of this bar, in Hz.
    pub frequency_hz: f32,
    /// Magnitude normalized to `[0, 1]`.
    pub height: f32,
    /// Whether this bar is one of the frame's dominant frequencies.
    pub dominant: bool,
}

/// Frequency of bar `index` on the logarithmic display axis.
pub fn bar_frequency(index: usize, bar_count: usize, min_freq: f32, max_freq: f32) -> f32 {
    debug_assert!(bar_count > 0 && min_freq > 0.0 && max_freq > min_freq);
    min_freq * (max_freq / min_freq).powf(index as f32 / bar_count as f32)
}

/// Map a snapshot onto `bar_count` logarithmically spaced display bars.
///
/// Deterministic: identical snapshot and parameters always produce
/// identical bars.
pub fn map_to_bars(
    snapshot: &SpectrumSnapshot,
    bar_count: usize,
    min_freq: f32,
    max_freq: f32,
) -> Vec<DisplayBar> {
    let bin_count = snapshot.fft_size / 2;
    (0..bar_count)
        .map(|i| {
            let frequency_hz = bar_frequency(i, bar_count, min_freq, max_freq);
            let bin = ((frequency_hz / snapshot.sample_rate_hz * snapshot.fft_size as f32)
                as usize)
                .min(bin_count - 1);
            DisplayBar {
                frequency_hz,
                height: f32::from(snapshot.magnitudes[bin]) / 255.0,
                dominant: false,
            }
        })
        .collect()
}
