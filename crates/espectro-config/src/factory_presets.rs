//! Factory presets bundled with the library.
//!
//! These instrument-focused presets are embedded at compile time and always
//! available without external files. They serve as starting points the user
//! tweaks from.

use crate::EqPreset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "flat",
    "vocals",
    "guitar",
    "bass_guitar",
    "drums",
    "piano",
];

/// TOML content for factory presets.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("flat", FLAT_PRESET),
    ("vocals", VOCALS_PRESET),
    ("guitar", GUITAR_PRESET),
    ("bass_guitar", BASS_GUITAR_PRESET),
    ("drums", DRUMS_PRESET),
    ("piano", PIANO_PRESET),
];

/// No filtering - every band flat.
const FLAT_PRESET: &str = r#"
name = "Flat"
description = "No filtering - all bands at 0 dB"

[gains]
bass = 0.0
low_mid = 0.0
mid = 0.0
high_mid = 0.0
treble = 0.0
"#;

/// Bring vocals forward by cutting the low end.
const VOCALS_PRESET: &str = r#"
name = "Vocals"
description = "Cuts lows and pushes the vocal mids forward"

[gains]
bass = -8.0
low_mid = -4.0
mid = 6.0
high_mid = 4.0
treble = 2.0
"#;

/// Emphasize guitar body and presence.
const GUITAR_PRESET: &str = r#"
name = "Guitar"
description = "Midrange focus for rhythm and lead guitar"

[gains]
bass = -6.0
low_mid = 4.0
mid = 6.0
high_mid = 4.0
treble = -2.0
"#;

/// Isolate the bass guitar register.
const BASS_GUITAR_PRESET: &str = r#"
name = "Bass Guitar"
description = "Low-end emphasis, rolled-off highs"

[gains]
bass = 8.0
low_mid = 6.0
mid = -4.0
high_mid = -6.0
treble = -8.0
"#;

/// Punchy kick plus crisp cymbals.
const DRUMS_PRESET: &str = r#"
name = "Drums"
description = "Kick punch and cymbal sparkle, scooped mids"

[gains]
bass = 6.0
low_mid = -2.0
mid = -4.0
high_mid = 4.0
treble = 6.0
"#;

/// Even lift across the piano's wide range.
const PIANO_PRESET: &str = r#"
name = "Piano"
description = "Gentle broad lift for acoustic piano"

[gains]
bass = 2.0
low_mid = 4.0
mid = 4.0
high_mid = 4.0
treble = 4.0
"#;

/// Get a factory preset by name.
pub fn get_factory_preset(name: &str) -> Option<EqPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .and_then(|(_, toml_str)| EqPreset::from_toml(toml_str).ok())
}

/// All factory presets, in menu order.
pub fn factory_presets() -> Vec<EqPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml_str)| EqPreset::from_toml(toml_str).ok())
        .collect()
}
