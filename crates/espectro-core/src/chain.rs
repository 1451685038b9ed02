//! The equalizer filter cascade.
//!
//! A [`FilterChain`] owns an ordered list of named band stages. The cascade
//! is built exactly once, on the first [`configure`](FilterChain::configure)
//! call; every later call with the same id set is a pure parameter update
//! that rewrites filter coefficients in place. Delay lines are never cleared
//! by an update, and stages are never recreated, so playback continues
//! through reconfiguration without dropouts or duplicated filtering.
//!
//! Structural changes (a different band set) require tearing the chain down
//! and building a new one; that only happens when the audio source changes.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::band::{BandError, BandKind, BandSpec, GAIN_RANGE_DB};
use crate::biquad::{
    Biquad, high_shelf_coefficients, low_shelf_coefficients, peaking_eq_coefficients,
};
use crate::effect::Effect;
use crate::param::SmoothedParam;

/// Parameter smoothing times, in milliseconds.
const FREQ_SMOOTHING_MS: f32 = 20.0;
const GAIN_SMOOTHING_MS: f32 = 10.0;
const Q_SMOOTHING_MS: f32 = 20.0;

/// One running band: smoothed parameters plus the biquad doing the work.
#[derive(Debug, Clone)]
struct BandStage {
    id: String,
    kind: BandKind,
    freq: SmoothedParam,
    gain: SmoothedParam,
    q: Option<SmoothedParam>,
    filter: Biquad,
    needs_update: bool,
}

impl BandStage {
    fn new(spec: &BandSpec, sample_rate: f32) -> Self {
        let mut stage = Self {
            id: spec.id.clone(),
            kind: spec.kind,
            freq: SmoothedParam::with_config(spec.frequency_hz, sample_rate, FREQ_SMOOTHING_MS),
            gain: SmoothedParam::with_config(spec.gain_db, sample_rate, GAIN_SMOOTHING_MS),
            q: spec
                .q
                .map(|q| SmoothedParam::with_config(q, sample_rate, Q_SMOOTHING_MS)),
            filter: Biquad::new(),
            needs_update: true,
        };
        stage.update_coefficients(sample_rate);
        stage
    }

    /// Retarget the smoothed parameters from a new spec. The biquad and its
    /// delay lines are untouched; coefficients catch up as the params move.
    fn set_targets(&mut self, spec: &BandSpec) {
        self.freq.set_target(spec.frequency_hz);
        self.gain.set_target(spec.gain_db);
        if let (Some(q), Some(target)) = (self.q.as_mut(), spec.q) {
            q.set_target(target);
        }
        self.needs_update = true;
    }

    fn advance(&mut self) {
        self.freq.advance();
        self.gain.advance();
        if let Some(q) = self.q.as_mut() {
            q.advance();
        }
    }

    fn settled(&self) -> bool {
        self.freq.is_settled()
            && self.gain.is_settled()
            && self.q.as_ref().is_none_or(SmoothedParam::is_settled)
    }

    fn update_coefficients(&mut self, sample_rate: f32) {
        // Clamp to 95% of Nyquist to avoid numerical instability near the limit
        let max_freq = sample_rate * 0.475;
        let freq = self.freq.get().min(max_freq);
        let gain = self.gain.get();

        let (b0, b1, b2, a0, a1, a2) = match self.kind {
            BandKind::Peaking => {
                let q = self.q.as_ref().map_or(1.0, SmoothedParam::get);
                peaking_eq_coefficients(freq, q, gain, sample_rate)
            }
            BandKind::LowShelf => low_shelf_coefficients(freq, gain, sample_rate),
            BandKind::HighShelf => high_shelf_coefficients(freq, gain, sample_rate),
        };
        self.filter.set_coefficients(b0, b1, b2, a0, a1, a2);
        self.needs_update = false;
    }
}

/// Ordered cascade of named filter bands.
///
/// Built lazily: [`configure`](Self::configure) with a non-empty spec list
/// builds the cascade in the given order; afterwards the same call becomes an
/// in-place parameter update keyed by band id.
#[derive(Debug, Clone)]
pub struct FilterChain {
    stages: Vec<BandStage>,
    /// Band id → cascade position, fixed at build time.
    index: HashMap<String, usize>,
    sample_rate: f32,
}

impl FilterChain {
    /// Create an empty (unbuilt) chain for the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stages: Vec::new(),
            index: HashMap::new(),
            sample_rate,
        }
    }

    /// Build or update the cascade from band specs.
    ///
    /// First call with a non-empty list builds the cascade in spec order.
    /// Subsequent calls must carry exactly the same id set and are applied
    /// as in-place parameter updates; anything else is a
    /// [`ChainError::BandCountChanged`] or [`ChainError::UnknownBand`].
    pub fn configure(&mut self, specs: &[BandSpec]) -> Result<(), ChainError> {
        for spec in specs {
            spec.validate()?;
        }

        if self.stages.is_empty() {
            self.build(specs)
        } else {
            self.update(specs)
        }
    }

    fn build(&mut self, specs: &[BandSpec]) -> Result<(), ChainError> {
        let mut stages = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());

        for spec in specs {
            if index.insert(spec.id.clone(), stages.len()).is_some() {
                return Err(ChainError::DuplicateBand { id: spec.id.clone() });
            }
            stages.push(BandStage::new(spec, self.sample_rate));
        }

        self.stages = stages;
        self.index = index;
        debug!(bands = self.stages.len(), "built filter cascade");
        Ok(())
    }

    fn update(&mut self, specs: &[BandSpec]) -> Result<(), ChainError> {
        if specs.len() != self.stages.len() {
            return Err(ChainError::BandCountChanged {
                expected: self.stages.len(),
                got: specs.len(),
            });
        }
        // Resolve every id before mutating anything, so a bad spec list
        // leaves the chain unchanged.
        let mut positions = Vec::with_capacity(specs.len());
        for spec in specs {
            let pos = *self
                .index
                .get(&spec.id)
                .ok_or_else(|| ChainError::UnknownBand { id: spec.id.clone() })?;
            if self.stages[pos].kind != spec.kind {
                return Err(ChainError::KindChanged { id: spec.id.clone() });
            }
            positions.push(pos);
        }
        for (spec, pos) in specs.iter().zip(positions) {
            self.stages[pos].set_targets(spec);
        }
        debug!(bands = specs.len(), "updated filter cascade parameters");
        Ok(())
    }

    /// Retarget a single band's gain, keeping everything else in place.
    pub fn set_gain(&mut self, id: &str, gain_db: f32) -> Result<(), ChainError> {
        let (min_gain, max_gain) = GAIN_RANGE_DB;
        if !gain_db.is_finite() || gain_db < min_gain || gain_db > max_gain {
            return Err(ChainError::InvalidBand(BandError::GainOutOfRange {
                id: id.to_string(),
                gain_db,
            }));
        }
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| ChainError::UnknownBand { id: id.to_string() })?;
        let stage = &mut self.stages[pos];
        stage.gain.set_target(gain_db);
        stage.needs_update = true;
        Ok(())
    }

    /// Whether the cascade has been built yet.
    pub fn is_built(&self) -> bool {
        !self.stages.is_empty()
    }

    /// Number of band stages in the cascade.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the cascade is empty (not yet built).
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Band ids in cascade order.
    pub fn band_ids(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.id.as_str()).collect()
    }

    /// Current gain target for a band, if it exists.
    pub fn gain_db(&self, id: &str) -> Option<f32> {
        self.index.get(id).map(|&pos| self.stages[pos].gain.target())
    }

    /// Sample rate the cascade runs at.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl Effect for FilterChain {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut sample = input;
        for stage in &mut self.stages {
            stage.advance();
            if stage.needs_update || !stage.settled() {
                stage.update_coefficients(self.sample_rate);
            }
            sample = stage.filter.process(sample);
        }
        sample
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for stage in &mut self.stages {
            stage.freq.set_sample_rate(sample_rate);
            stage.gain.set_sample_rate(sample_rate);
            if let Some(q) = stage.q.as_mut() {
                q.set_sample_rate(sample_rate);
            }
            stage.update_coefficients(sample_rate);
        }
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.filter.clear();
            stage.freq.snap_to_target();
            stage.gain.snap_to_target();
            if let Some(q) = stage.q.as_mut() {
                q.snap_to_target();
            }
            stage.update_coefficients(self.sample_rate);
        }
    }
}

/// Errors from building or updating a [`FilterChain`].
#[derive(Debug, Error, PartialEq)]
pub enum ChainError {
    /// A band spec failed validation.
    #[error(transparent)]
    InvalidBand(#[from] BandError),

    /// Two specs in one configure call share an id.
    #[error("duplicate band id '{id}' in chain specification")]
    DuplicateBand {
        /// The repeated id.
        id: String,
    },

    /// Reconfiguration changed the number of bands; the cascade is fixed
    /// after the first build.
    #[error("cascade has {expected} bands but reconfiguration supplied {got}")]
    BandCountChanged {
        /// Bands in the built cascade.
        expected: usize,
        /// Bands in the offending spec list.
        got: usize,
    },

    /// Reconfiguration referenced an id the cascade was not built with.
    #[error("band '{id}' does not exist in the built cascade")]
    UnknownBand {
        /// The unknown id.
        id: String,
    },

    /// Reconfiguration tried to change a band's filter kind in place.
    #[error("band '{id}' cannot change kind without a rebuild")]
    KindChanged {
        /// The offending id.
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_band_layout() -> Vec<BandSpec> {
        vec![
            BandSpec::low_shelf("bass", 60.0, 0.0),
            BandSpec::peaking("low_mid", 250.0, 0.0, 1.0),
            BandSpec::peaking("mid", 1000.0, 0.0, 1.0),
            BandSpec::peaking("high_mid", 4000.0, 0.0, 1.0),
            BandSpec::high_shelf("treble", 8000.0, 0.0),
        ]
    }

    #[test]
    fn test_first_configure_builds_in_order() {
        let mut chain = FilterChain::new(48000.0);
        assert!(!chain.is_built());

        chain.configure(&five_band_layout()).unwrap();

        assert!(chain.is_built());
        assert_eq!(chain.len(), 5);
        assert_eq!(
            chain.band_ids(),
            vec!["bass", "low_mid", "mid", "high_mid", "treble"]
        );
    }

    #[test]
    fn test_reconfigure_is_pure_parameter_update() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();
        let ids_before = chain
            .band_ids()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        let mut specs = five_band_layout();
        specs[0].gain_db = 8.0;
        specs[2].gain_db = -4.0;
        chain.configure(&specs).unwrap();

        assert_eq!(chain.len(), 5, "no stage may be added or removed");
        assert_eq!(chain.band_ids(), ids_before, "cascade order is fixed");
        assert_eq!(chain.gain_db("bass"), Some(8.0));
        assert_eq!(chain.gain_db("mid"), Some(-4.0));
    }

    #[test]
    fn test_reconfigure_identical_specs_idempotent() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();

        // Run some audio through so stages carry state
        for _ in 0..256 {
            chain.process(0.25);
        }

        chain.configure(&five_band_layout()).unwrap();
        chain.configure(&five_band_layout()).unwrap();

        assert_eq!(chain.len(), 5);
        let out = chain.process(0.25);
        assert!(out.is_finite());
    }

    #[test]
    fn test_update_out_of_order_is_keyed_by_id() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();

        let mut specs = five_band_layout();
        specs.reverse();
        specs.iter_mut().for_each(|s| s.gain_db = 3.0);
        chain.configure(&specs).unwrap();

        // Cascade order is unchanged even though specs arrived reversed
        assert_eq!(
            chain.band_ids(),
            vec!["bass", "low_mid", "mid", "high_mid", "treble"]
        );
        assert_eq!(chain.gain_db("treble"), Some(3.0));
    }

    #[test]
    fn test_band_count_change_rejected() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();

        let err = chain
            .configure(&five_band_layout()[..3])
            .unwrap_err();
        assert_eq!(
            err,
            ChainError::BandCountChanged {
                expected: 5,
                got: 3
            }
        );
    }

    #[test]
    fn test_unknown_band_rejected_without_mutation() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();

        let mut specs = five_band_layout();
        specs[4] = BandSpec::high_shelf("presence", 10000.0, 5.0);
        specs[0].gain_db = 9.0;

        let err = chain.configure(&specs).unwrap_err();
        assert_eq!(err, ChainError::UnknownBand { id: "presence".into() });
        // The valid part of the bad list must not have been applied
        assert_eq!(chain.gain_db("bass"), Some(0.0));
    }

    #[test]
    fn test_kind_change_rejected() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();

        let mut specs = five_band_layout();
        specs[2] = BandSpec::low_shelf("mid", 1000.0, 0.0);
        assert_eq!(
            chain.configure(&specs).unwrap_err(),
            ChainError::KindChanged { id: "mid".into() }
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut chain = FilterChain::new(48000.0);
        let specs = vec![
            BandSpec::peaking("mid", 1000.0, 0.0, 1.0),
            BandSpec::peaking("mid", 2000.0, 0.0, 1.0),
        ];
        assert_eq!(
            chain.configure(&specs).unwrap_err(),
            ChainError::DuplicateBand { id: "mid".into() }
        );
        assert!(!chain.is_built());
    }

    #[test]
    fn test_invalid_spec_rejected() {
        let mut chain = FilterChain::new(48000.0);
        let specs = vec![BandSpec::peaking("mid", 1000.0, 25.0, 1.0)];
        assert!(matches!(
            chain.configure(&specs),
            Err(ChainError::InvalidBand(_))
        ));
    }

    #[test]
    fn test_set_gain_single_band() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();

        chain.set_gain("mid", 6.0).unwrap();
        assert_eq!(chain.gain_db("mid"), Some(6.0));

        assert!(chain.set_gain("nope", 0.0).is_err());
        assert!(chain.set_gain("mid", 30.0).is_err());
    }

    #[test]
    fn test_flat_chain_passes_dc() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();

        let mut output = 0.0;
        for _ in 0..5000 {
            output = chain.process(1.0);
        }
        assert!(
            (output - 1.0).abs() < 0.05,
            "flat cascade should pass DC unchanged, got {}",
            output
        );
    }

    #[test]
    fn test_processing_stays_finite_through_updates() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&five_band_layout()).unwrap();

        for step in 0..10 {
            let mut specs = five_band_layout();
            let gain = if step % 2 == 0 { 12.0 } else { -12.0 };
            specs.iter_mut().for_each(|s| s.gain_db = gain);
            chain.configure(&specs).unwrap();

            for i in 0..512 {
                let input = (i as f32 * 0.1).sin();
                assert!(chain.process(input).is_finite());
            }
        }
    }

    #[test]
    fn test_reset_clears_state_keeps_parameters() {
        let mut chain = FilterChain::new(48000.0);
        let mut specs = five_band_layout();
        specs[0].gain_db = 10.0;
        chain.configure(&specs).unwrap();

        for _ in 0..100 {
            chain.process(1.0);
        }
        chain.reset();

        assert_eq!(chain.gain_db("bass"), Some(10.0));
        assert!(chain.process(0.5).is_finite());
    }

    #[test]
    fn test_configure_empty_on_unbuilt_chain_stays_unbuilt() {
        let mut chain = FilterChain::new(48000.0);
        chain.configure(&[]).unwrap();
        assert!(!chain.is_built());
    }
}
