//! Band descriptions for the equalizer cascade.
//!
//! A [`BandSpec`] is the validated, UI-facing description of one filter
//! stage: what kind of filter it is, where it sits, and how hard it pushes.
//! The [`FilterChain`](crate::FilterChain) turns specs into running biquads.

use thiserror::Error;

/// Gain range accepted for any band, in dB.
pub const GAIN_RANGE_DB: (f32, f32) = (-20.0, 20.0);

/// Filter shape of a single band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    /// Shelving boost/cut below the corner frequency.
    LowShelf,
    /// Shelving boost/cut above the corner frequency.
    HighShelf,
    /// Bell-shaped boost/cut around the center frequency; requires a Q.
    Peaking,
}

/// Description of one filter band.
///
/// Invariants (enforced by [`validate`](Self::validate)):
/// - `gain_db` within [`GAIN_RANGE_DB`]
/// - `frequency_hz` positive and finite
/// - `q` present and positive for [`BandKind::Peaking`], absent otherwise
#[derive(Debug, Clone, PartialEq)]
pub struct BandSpec {
    /// Stable identifier, unique within a chain (e.g. `"bass"`, `"mid"`).
    pub id: String,
    /// Filter shape.
    pub kind: BandKind,
    /// Center (peaking) or corner (shelf) frequency in Hz.
    pub frequency_hz: f32,
    /// Boost or cut in dB.
    pub gain_db: f32,
    /// Bandwidth factor; only meaningful for peaking bands.
    pub q: Option<f32>,
}

impl BandSpec {
    /// A peaking band with the given center frequency and Q.
    pub fn peaking(id: impl Into<String>, frequency_hz: f32, gain_db: f32, q: f32) -> Self {
        Self {
            id: id.into(),
            kind: BandKind::Peaking,
            frequency_hz,
            gain_db,
            q: Some(q),
        }
    }

    /// A low-shelf band with the given corner frequency.
    pub fn low_shelf(id: impl Into<String>, frequency_hz: f32, gain_db: f32) -> Self {
        Self {
            id: id.into(),
            kind: BandKind::LowShelf,
            frequency_hz,
            gain_db,
            q: None,
        }
    }

    /// A high-shelf band with the given corner frequency.
    pub fn high_shelf(id: impl Into<String>, frequency_hz: f32, gain_db: f32) -> Self {
        Self {
            id: id.into(),
            kind: BandKind::HighShelf,
            frequency_hz,
            gain_db,
            q: None,
        }
    }

    /// Check the band invariants.
    ///
    /// Out-of-range values are an error, never silently clamped: the caller
    /// (UI or preset loader) is expected to produce valid specs.
    pub fn validate(&self) -> Result<(), BandError> {
        if self.id.is_empty() {
            return Err(BandError::EmptyId);
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(BandError::InvalidFrequency {
                id: self.id.clone(),
                frequency_hz: self.frequency_hz,
            });
        }
        let (min_gain, max_gain) = GAIN_RANGE_DB;
        if !self.gain_db.is_finite() || self.gain_db < min_gain || self.gain_db > max_gain {
            return Err(BandError::GainOutOfRange {
                id: self.id.clone(),
                gain_db: self.gain_db,
            });
        }
        match (self.kind, self.q) {
            (BandKind::Peaking, None) => Err(BandError::MissingQ { id: self.id.clone() }),
            (BandKind::Peaking, Some(q)) if !q.is_finite() || q <= 0.0 => {
                Err(BandError::InvalidQ { id: self.id.clone(), q })
            }
            (BandKind::LowShelf | BandKind::HighShelf, Some(_)) => {
                Err(BandError::UnexpectedQ { id: self.id.clone() })
            }
            _ => Ok(()),
        }
    }
}

/// Validation failures for a single band description.
#[derive(Debug, Error, PartialEq)]
pub enum BandError {
    /// Band id is empty.
    #[error("band id must not be empty")]
    EmptyId,

    /// Frequency is non-positive or non-finite.
    #[error("band '{id}': frequency {frequency_hz} Hz is not a positive finite value")]
    InvalidFrequency {
        /// Offending band id.
        id: String,
        /// Offending frequency value.
        frequency_hz: f32,
    },

    /// Gain outside [`GAIN_RANGE_DB`].
    #[error("band '{id}': gain {gain_db} dB outside [{}, {}] dB", GAIN_RANGE_DB.0, GAIN_RANGE_DB.1)]
    GainOutOfRange {
        /// Offending band id.
        id: String,
        /// Offending gain value.
        gain_db: f32,
    },

    /// Peaking band without a Q factor.
    #[error("band '{id}': peaking bands require a Q factor")]
    MissingQ {
        /// Offending band id.
        id: String,
    },

    /// Non-positive or non-finite Q.
    #[error("band '{id}': Q {q} must be positive and finite")]
    InvalidQ {
        /// Offending band id.
        id: String,
        /// Offending Q value.
        q: f32,
    },

    /// Shelf band carrying a Q factor it cannot use.
    #[error("band '{id}': shelf bands take no Q factor")]
    UnexpectedQ {
        /// Offending band id.
        id: String,
    },
}
