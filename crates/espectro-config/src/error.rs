//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

use espectro_core::GAIN_RANGE_DB;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Preset not found
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Preset references a band the layout does not have
    #[error("preset '{preset}' references unknown band '{band}'")]
    UnknownBand {
        /// Name of the offending preset.
        preset: String,
        /// The unknown band id.
        band: String,
    },

    /// Preset gain outside the accepted range
    #[error("preset '{preset}': band '{band}' gain {gain_db} dB outside [{}, {}] dB", GAIN_RANGE_DB.0, GAIN_RANGE_DB.1)]
    GainOutOfRange {
        /// Name of the offending preset.
        preset: String,
        /// Band id carrying the bad gain.
        band: String,
        /// Offending gain value.
        gain_db: f32,
    },

    /// Layout could not be turned into band specs
    #[error("invalid band layout: {0}")]
    InvalidLayout(#[from] espectro_core::BandError),

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
