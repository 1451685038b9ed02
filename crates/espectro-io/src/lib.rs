//! Audio I/O layer for espectro.
//!
//! This crate provides:
//!
//! - **File decoding**: [`decode_audio`] loads any supported format to mono
//!   f32 samples via symphonia, behind a thin extension guard
//! - **Playback transport**: [`Player`] owns the decoded track, the filter
//!   cascade, and the analysis tap; its [`fill`](Player::fill) method is the
//!   body of the output-stream callback
//! - **Output streaming**: [`OutputStream`] for live playback via cpal
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use espectro_io::{OutputStream, Player, StreamConfig, decode_audio};
//!
//! let audio = decode_audio("track.mp3".as_ref())?;
//! let player = Player::new(audio);
//! player.configure_bands(&band_specs)?;
//!
//! let mut stream = OutputStream::new(StreamConfig::default())?;
//! let channels = stream.channels() as usize;
//! let cb = player.clone();
//! stream.start(move |data| cb.fill(data, channels))?;
//! player.play();
//! ```

mod decode;
mod player;
mod stream;

pub use decode::{AudioData, SUPPORTED_EXTENSIONS, decode_audio, is_supported_file};
pub use player::Player;
pub use stream::{AudioDevice, OutputStream, StreamConfig, default_output_device, list_output_devices};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File extension is not one of the supported audio formats.
    #[error("unsupported file type '{0}' (expected one of: mp3, wav, ogg, m4a, flac)")]
    UnsupportedFormat(String),

    /// Container probing or packet decoding failed.
    #[error("audio decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// The container holds no decodable audio track.
    #[error("no audio track found in file")]
    NoAudioTrack,

    /// The audio track does not declare a sample rate.
    #[error("audio track has no sample rate")]
    UnknownSampleRate,

    /// Audio stream setup or runtime error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// No audio output device available on the system.
    #[error("no audio output device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
