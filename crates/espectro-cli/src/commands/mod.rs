//! CLI subcommands.

pub mod analyze;
pub mod devices;
pub mod play;
pub mod presets;

use std::collections::BTreeMap;

use espectro_config::{BandLayout, EqPreset, resolve_preset};

/// Parse a `band=gain` argument, e.g. `mid=6` or `bass=-4.5`.
pub fn parse_band_gain(s: &str) -> Result<(String, f32), String> {
    let (band, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid gain '{s}' (expected band=dB, e.g. mid=6)"))?;
    let gain_db: f32 = value
        .parse()
        .map_err(|_| format!("invalid gain value '{value}' for band '{band}'"))?;
    Ok((band.to_string(), gain_db))
}

/// Resolve the starting gains: preset first (if named), then per-band
/// overrides on top. The result is validated against the layout.
pub fn resolve_gains(
    layout: &BandLayout,
    preset: Option<&str>,
    overrides: &[(String, f32)],
) -> anyhow::Result<BTreeMap<String, f32>> {
    let mut merged = match preset {
        Some(name) => resolve_preset(name)?,
        None => EqPreset::new("Custom"),
    };
    for (band, gain_db) in overrides {
        merged.gains.insert(band.clone(), *gain_db);
    }
    merged.validate(layout)?;
    Ok(merged.gains)
}
