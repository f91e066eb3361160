//! User settings persistence
//!
//! A flat key/value store persisted to `~/.config/vellum/settings.yaml`.
//! The keys this core cares about are the selected color scheme
//! (`colorscheme`) and per-language style overrides
//! (`style.<languageId>.<styleId>`); hosts are free to park their own keys
//! here as well.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the color scheme used when the setting is absent.
pub const DEFAULT_SCHEME_NAME: &str = "Default";

const SCHEME_KEY: &str = "colorscheme";

/// Read access to user settings.
///
/// The style resolver only needs `get`; a host with its own settings
/// machinery implements this instead of going through [`Settings`].
pub trait SettingsSource {
    /// Look up a raw setting value by key.
    fn get(&self, key: &str) -> Option<&str>;
}

/// User settings that persist across sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

/// Key under which the override for one (language, style id) pair is stored.
pub fn style_key(language_id: &str, style_id: u8) -> String {
    format!("style.{}.{}", language_id, style_id)
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value; an empty string is kept (an empty override is
    /// treated as "no override" by the resolver, not by the store).
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Name of the selected color scheme.
    pub fn color_scheme(&self) -> &str {
        self.get(SCHEME_KEY).unwrap_or(DEFAULT_SCHEME_NAME)
    }

    pub fn set_color_scheme(&mut self, name: &str) {
        self.set(SCHEME_KEY, name);
    }

    /// Raw style override string for one style id of a language.
    pub fn style_override(&self, language_id: &str, style_id: u8) -> Option<&str> {
        self.get(&style_key(language_id, style_id))
    }

    pub fn set_style_override(&mut self, language_id: &str, style_id: u8, value: &str) {
        self.set(style_key(language_id, style_id), value);
    }

    /// Load settings from disk, or return defaults if not found.
    ///
    /// A malformed settings file is not fatal: the user can still edit,
    /// just without their customizations.
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::settings_file() else {
            tracing::debug!("No config directory available, using default settings");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::settings_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::parse(path.display().to_string(), e))?;
        std::fs::write(path, content)?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }
}

impl SettingsSource for Settings {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}
