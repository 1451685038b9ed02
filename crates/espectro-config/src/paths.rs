//! Platform-specific paths for user presets.
//!
//! - **User presets**: `~/.config/espectro/presets/` (Linux),
//!   `~/Library/Application Support/espectro/presets/` (macOS),
//!   `%APPDATA%\espectro\presets\` (Windows)

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "espectro";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific presets directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_presets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PRESETS_SUBDIR)
}

/// Returns the user-specific configuration directory.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Find a user preset file by name (without the `.toml` extension).
pub fn find_preset(name: &str) -> Option<PathBuf> {
    let path = user_presets_dir().join(format!("{name}.toml"));
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_dir_under_config_dir() {
        let dir = user_presets_dir();
        assert!(dir.ends_with("espectro/presets") || dir.ends_with("espectro\\presets"));
    }

    #[test]
    fn test_find_missing_preset() {
        assert!(find_preset("definitely-not-a-real-preset-name").is_none());
    }
}
