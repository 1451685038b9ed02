//! Espectro Core - DSP primitives for the espectro audio analyzer
//!
//! This crate provides the signal-path building blocks shared by the
//! playback engine and the analysis pipeline:
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for signal-path stages
//!
//! ## The Equalizer Cascade
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients
//!   (peaking EQ, low shelf, high shelf)
//! - [`BandSpec`] / [`BandKind`] - Validated description of one band
//! - [`FilterChain`] - Ordered, id-keyed band cascade. Built once on first
//!   configure, mutated in place thereafter so live reconfiguration never
//!   interrupts playback.
//! - [`SmoothedParam`] - Exponential parameter smoothing (zipper-free
//!   slider moves)
//!
//! ## Note Math
//!
//! - [`frequency_to_note`] / [`note_to_frequency`] - Equal-tempered
//!   conversion around A4 = 440 Hz
//! - [`note_gridlines`] - Octave gridline labels for the spectrum display
//!
//! # Example
//!
//! ```rust
//! use espectro_core::{BandSpec, Effect, FilterChain};
//!
//! let mut chain = FilterChain::new(48000.0);
//! chain
//!     .configure(&[
//!         BandSpec::low_shelf("bass", 60.0, 4.0),
//!         BandSpec::peaking("mid", 1000.0, -2.0, 1.0),
//!         BandSpec::high_shelf("treble", 8000.0, 1.0),
//!     ])
//!     .unwrap();
//!
//! // Audio path: one sample at a time, or whole blocks
//! let out = chain.process(0.25);
//! assert!(out.is_finite());
//!
//! // Later, a slider moved: same ids, new gains, no rebuild
//! chain.set_gain("mid", 3.0).unwrap();
//! ```

mod band;
mod biquad;
mod chain;
mod effect;
mod note;
mod param;

pub use band::{BandError, BandKind, BandSpec, GAIN_RANGE_DB};
pub use biquad::{
    Biquad, high_shelf_coefficients, low_shelf_coefficients, peaking_eq_coefficients,
};
pub use chain::{ChainError, FilterChain};
pub use effect::Effect;
pub use note::{
    A4_HZ, NOTE_NAMES, NoteError, NoteLabel, frequency_to_note, label_for_midi,
    midi_to_frequency, note_gridlines, note_to_frequency,
};
pub use param::SmoothedParam;
