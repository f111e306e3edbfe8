//! # Settings Loader
//!
//! Centralized settings loading for the subscription tools. Settings live in a JSON
//! file (by default `settings.json` in the current directory) holding the currency
//! label, the default category for new subscriptions, the upcoming-billing window
//! and the path of the subscription snapshot.
//!
//! Every field is optional in the file; missing ones take the values of
//! `Settings::default()`.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/my_settings.json")?;
//!
//! // The given file, then settings.json, then the built-in defaults
//! let path = Some(PathBuf::from("config/settings.json"));
//! let settings = settings_loader::load_or_default(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;
use tracing::{debug, warn};

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Tries the provided path first, then the default location. Returns None only if no
/// usable settings file is found anywhere.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    if let Some(settings_path) = path {
        match load_settings(settings_path) {
            Ok(settings) => return Ok(Some(settings)),
            Err(e) => {
                warn!("{e:#}; falling back to {DEFAULT_SETTINGS_FILE}");
            }
        }
    }

    if !default_settings_exist() {
        return Ok(None);
    }
    match load_default_settings() {
        Ok(settings) => Ok(Some(settings)),
        Err(e) => {
            warn!("{e:#}; using built-in defaults");
            Ok(None)
        }
    }
}

/// Like `load_settings_with_fallback`, but ends with `Settings::default()`.
pub fn load_or_default(path: Option<&PathBuf>) -> Result<Settings> {
    Ok(load_settings_with_fallback(path)?.unwrap_or_default())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

/// Checks if the default settings file (settings.json) exists
pub fn default_settings_exist() -> bool {
    settings_file_exists(DEFAULT_SETTINGS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"currency": "EUR", "upcoming_window_days": 7}"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.upcoming_window_days, 7);
        assert_eq!(settings.default_category, Settings::default().default_category);
    }

    #[test]
    fn test_load_settings_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.json"));
    }

    #[test]
    fn test_load_with_fallback_prefers_given_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"default_category": "Развлечения"}"#).unwrap();

        let settings = load_settings_with_fallback(Some(&path)).unwrap().unwrap();
        assert_eq!(settings.default_category, "Развлечения");
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let path = PathBuf::from("/definitely/not/here/settings.json");
        // crate directory has no settings.json, so the built-in defaults apply
        assert_eq!(load_or_default(Some(&path)).unwrap(), Settings::default());
    }

    #[test]
    fn test_settings_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(!settings_file_exists(&path));
        fs::write(&path, "{}").unwrap();
        assert!(settings_file_exists(&path));
        // directories do not count
        assert!(!settings_file_exists(dir.path()));
    }
}
