//! Espectro Config - band layout and equalizer preset management
//!
//! This crate owns everything the equalizer UI reads from or writes to
//! disk:
//!
//! - [`BandLayout`] - the structural description of the cascade (which
//!   bands exist, in what order, at what frequencies)
//! - [`EqPreset`] - a named gain map, stored as TOML
//! - [`factory_presets`] - embedded instrument presets (vocals, guitar,
//!   bass guitar, drums, piano, flat)
//! - [`paths`] - platform preset directories
//! - [`resolve_preset`] - name resolution, factory presets first, then the
//!   user preset directory

mod error;
mod factory_presets;
mod layout;
pub mod paths;
mod preset;

pub use error::ConfigError;
pub use factory_presets::{FACTORY_PRESET_NAMES, factory_presets, get_factory_preset};
pub use layout::{BandConfig, BandKindConfig, BandLayout};
pub use preset::EqPreset;

/// Resolve a preset by name: factory presets first, then the user preset
/// directory.
pub fn resolve_preset(name: &str) -> Result<EqPreset, ConfigError> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }
    if let Some(path) = paths::find_preset(name) {
        return EqPreset::load(&path);
    }
    Err(ConfigError::PresetNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_factory_preset() {
        let preset = resolve_preset("drums").unwrap();
        assert_eq!(preset.name, "Drums");
    }

    #[test]
    fn test_resolve_unknown_preset() {
        assert!(matches!(
            resolve_preset("no-such-preset"),
            Err(ConfigError::PresetNotFound(_))
        ));
    }
}
