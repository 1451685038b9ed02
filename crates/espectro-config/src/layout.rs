//! Band layout: the structural description of the equalizer cascade.
//!
//! The layout fixes which bands exist, their order, kinds, and center
//! frequencies. Presets only carry gains; combining a layout with a gain
//! map yields the validated [`BandSpec`] list the cascade is built from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use espectro_core::{BandKind, BandSpec};

use crate::error::ConfigError;

/// Serializable counterpart of [`BandKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKindConfig {
    /// Shelving boost/cut below the corner frequency.
    LowShelf,
    /// Shelving boost/cut above the corner frequency.
    HighShelf,
    /// Bell-shaped boost/cut around the center frequency.
    Peaking,
}

impl From<BandKindConfig> for BandKind {
    fn from(kind: BandKindConfig) -> Self {
        match kind {
            BandKindConfig::LowShelf => BandKind::LowShelf,
            BandKindConfig::HighShelf => BandKind::HighShelf,
            BandKindConfig::Peaking => BandKind::Peaking,
        }
    }
}

/// One band's structural description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    /// Stable band id referenced by presets.
    pub id: String,
    /// Human-readable label for the UI.
    pub label: String,
    /// Filter kind.
    pub kind: BandKindConfig,
    /// Center/corner frequency in Hz.
    pub frequency_hz: f32,
    /// Q factor for peaking bands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<f32>,
}

/// Ordered cascade layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandLayout {
    /// Bands in cascade order.
    pub bands: Vec<BandConfig>,
}

impl BandLayout {
    /// The standard five-band layout: shelves at the edges, peaking bells
    /// across the mids.
    pub fn five_band() -> Self {
        Self {
            bands: vec![
                BandConfig {
                    id: "bass".into(),
                    label: "Bass".into(),
                    kind: BandKindConfig::LowShelf,
                    frequency_hz: 60.0,
                    q: None,
                },
                BandConfig {
                    id: "low_mid".into(),
                    label: "Low Mid".into(),
                    kind: BandKindConfig::Peaking,
                    frequency_hz: 250.0,
                    q: Some(1.0),
                },
                BandConfig {
                    id: "mid".into(),
                    label: "Mid".into(),
                    kind: BandKindConfig::Peaking,
                    frequency_hz: 1000.0,
                    q: Some(1.0),
                },
                BandConfig {
                    id: "high_mid".into(),
                    label: "High Mid".into(),
                    kind: BandKindConfig::Peaking,
                    frequency_hz: 4000.0,
                    q: Some(1.0),
                },
                BandConfig {
                    id: "treble".into(),
                    label: "Treble".into(),
                    kind: BandKindConfig::HighShelf,
                    frequency_hz: 8000.0,
                    q: None,
                },
            ],
        }
    }

    /// Band ids in cascade order.
    pub fn band_ids(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.id.as_str()).collect()
    }

    /// Whether the layout contains a band with this id.
    pub fn has_band(&self, id: &str) -> bool {
        self.bands.iter().any(|b| b.id == id)
    }

    /// Combine the layout with a gain map into cascade-ready band specs.
    ///
    /// Bands missing from the map get 0 dB (flat). Gains for unknown bands
    /// are ignored here; [`EqPreset::validate`](crate::EqPreset::validate)
    /// catches them earlier.
    pub fn to_specs(&self, gains: &BTreeMap<String, f32>) -> Result<Vec<BandSpec>, ConfigError> {
        let mut specs = Vec::with_capacity(self.bands.len());
        for band in &self.bands {
            let gain_db = gains.get(&band.id).copied().unwrap_or(0.0);
            let spec = BandSpec {
                id: band.id.clone(),
                kind: band.kind.into(),
                frequency_hz: band.frequency_hz,
                gain_db,
                q: band.q,
            };
            spec.validate()?;
            specs.push(spec);
        }
        Ok(specs)
    }
}

impl Default for BandLayout {
    fn default() -> Self {
        Self::five_band()
    }
}
