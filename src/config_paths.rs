//! Centralized configuration paths
//!
//! All user configuration lives under:
//! - Unix/macOS: `~/.config/vellum/`
//! - Windows: `%APPDATA%\vellum\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;

const APP_DIR: &str = "vellum";

/// Base config directory.
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/vellum`
///   - Else: `~/.config/vellum`
///
/// Windows:
///   - `%APPDATA%\vellum`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/vellum/settings.yaml`
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.yaml"))
}

/// `~/.config/vellum/schemes/` — user-defined color scheme files
pub fn schemes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("schemes"))
}

fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure the user schemes dir exists, returning it
pub fn ensure_schemes_dir() -> Result<PathBuf, ConfigError> {
    let schemes = ensure_config_dir()?.join("schemes");
    ensure_dir(&schemes)?;
    Ok(schemes)
}
