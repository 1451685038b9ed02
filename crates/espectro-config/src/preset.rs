//! Equalizer preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use espectro_core::GAIN_RANGE_DB;

use crate::error::ConfigError;
use crate::layout::BandLayout;

/// An equalizer preset: a named gain map over the band layout.
///
/// Presets are stored as TOML files. They carry gains only; the band
/// structure itself comes from the [`BandLayout`].
///
/// # TOML Format
///
/// ```toml
/// name = "Vocals"
/// description = "Bring vocals forward"
///
/// [gains]
/// bass = -8.0
/// low_mid = -4.0
/// mid = 6.0
/// high_mid = 4.0
/// treble = 2.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EqPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Gain in dB per band id. Bands not listed stay flat.
    #[serde(default)]
    pub gains: BTreeMap<String, f32>,
}

impl EqPreset {
    /// Create a new flat preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            gains: BTreeMap::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set one band's gain.
    pub fn with_gain(mut self, band: impl Into<String>, gain_db: f32) -> Self {
        self.gains.insert(band.into(), gain_db);
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: EqPreset = toml::from_str(&content)?;
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Check the preset against a layout: every gain must reference an
    /// existing band and sit within the accepted range.
    pub fn validate(&self, layout: &BandLayout) -> Result<(), ConfigError> {
        let (min_gain, max_gain) = GAIN_RANGE_DB;
        for (band, &gain_db) in &self.gains {
            if !layout.has_band(band) {
                return Err(ConfigError::UnknownBand {
                    preset: self.name.clone(),
                    band: band.clone(),
                });
            }
            if !gain_db.is_finite() || gain_db < min_gain || gain_db > max_gain {
                return Err(ConfigError::GainOutOfRange {
                    preset: self.name.clone(),
                    band: band.clone(),
                    gain_db,
                });
            }
        }
        Ok(())
    }
}
