// src/settings.rs
//
// User settings persisted as JSON in the platform config directory.
// Every field carries a serde default so new fields never invalidate a
// settings file written by an older build.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no platform config directory available")]
    NoConfigDir,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Persisted opt-in for foreground push notifications. Read once at
    /// startup to decide the notification bridge's initial state.
    #[serde(default)]
    pub push_subscribed: bool,
    /// Reopen the previous run's popout windows on launch.
    #[serde(default = "default_reopen_popouts")]
    pub reopen_popouts: bool,
    #[serde(default = "default_theme_mode")]
    pub theme_mode: String, // "dark" | "light" | "auto"
}

fn default_reopen_popouts() -> bool {
    true
}
fn default_theme_mode() -> String {
    "auto".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            push_subscribed: false,
            reopen_popouts: default_reopen_popouts(),
            theme_mode: default_theme_mode(),
        }
    }
}

/// Path of the settings file, creating the config directory if needed.
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    let dir = dirs::config_dir()
        .ok_or(SettingsError::NoConfigDir)?
        .join("Relay");
    fs::create_dir_all(&dir)?;
    Ok(dir.join("settings.json"))
}

/// Load settings from `path`. A file that does not exist yet is a first
/// run and yields defaults.
pub fn load_settings(path: &Path) -> Result<AppSettings, SettingsError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save settings atomically: write to a temp file, then rename, so a crash
/// mid-write never leaves a truncated settings file behind.
pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(settings)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &json)?;
    fs::rename(&temp_path, path)?;
    tlog!("[Settings] Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("settings.json")).unwrap();
        assert!(!settings.push_subscribed);
        assert!(settings.reopen_popouts);
        assert_eq!(settings.theme_mode, "auto");
    }

    #[test]
    fn test_round_trip_preserves_push_subscribed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = AppSettings::default();
        settings.push_subscribed = true;
        settings.theme_mode = "dark".to_string();
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert!(loaded.push_subscribed);
        assert_eq!(loaded.theme_mode, "dark");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "push_subscribed": true }"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert!(loaded.push_subscribed);
        assert!(loaded.reopen_popouts);
        assert_eq!(loaded.theme_mode, "auto");
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        save_settings(&path, &AppSettings::default()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_garbled_file_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(SettingsError::Parse(_))
        ));
    }
}
