//! Espectro Analysis - the per-frame spectral pipeline
//!
//! This crate turns the audio flowing out of the filter cascade into what
//! the display and the timeline consume:
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`tap`] - [`AnalysisTap`]: pass-through stage recording the signal and
//!   producing smoothed, byte-quantized [`SpectrumSnapshot`]s
//! - [`bars`] - logarithmic frequency axis: [`map_to_bars`] buckets a
//!   snapshot into a fixed number of [`DisplayBar`]s
//! - [`tracker`] - [`DominantTracker`]: top-3 peak selection plus the
//!   debounced [`TimelineEntry`] event log
//!
//! ## Per-frame flow
//!
//! ```rust
//! use espectro_analysis::{AnalysisTap, DominantTracker, map_to_bars};
//! use espectro_analysis::bars::{DEFAULT_BAR_COUNT, DEFAULT_MAX_FREQ, DEFAULT_MIN_FREQ};
//!
//! let mut tap = AnalysisTap::new(48000.0);
//! let mut tracker = DominantTracker::new();
//!
//! // Audio thread pushes post-filter blocks...
//! tap.push_block(&vec![0.0; 4096]);
//!
//! // ...and each render tick does one sample/track cycle
//! let snapshot = tap.snapshot();
//! let mut bars = map_to_bars(&snapshot, DEFAULT_BAR_COUNT, DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ);
//! let entry = tracker.update(&mut bars, 0.0);
//! assert!(entry.is_none()); // silence emits nothing
//! ```

pub mod bars;
pub mod fft;
pub mod tap;
pub mod tracker;

pub use bars::{DisplayBar, bar_frequency, map_to_bars};
pub use fft::{Fft, Window};
pub use tap::{AnalysisTap, SpectrumSnapshot};
pub use tracker::{DominantTracker, TimelineEntry};
