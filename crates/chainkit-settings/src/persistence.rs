//! Settings Persistence
//!
//! Loads and saves configuration files as JSON or TOML, chosen by file
//! extension. Validation runs after every load and before every save.

use crate::error::{ConfigResult, SettingsError, SettingsResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "chainkit";

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format for a path, by extension.
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) => Err(SettingsError::UnsupportedFormat(ext.to_string())),
            None => Err(SettingsError::UnsupportedFormat(format!(
                "{} has no extension, expected .json or .toml",
                path.display()
            ))),
        }
    }
}

/// A configuration document that can be validated and persisted.
pub trait ConfigFile: Serialize + DeserializeOwned + Sized {
    /// Check the configuration contract.
    fn validate(&self) -> ConfigResult<()>;

    /// Load from a `.json` or `.toml` file and validate.
    fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate, then write to a `.json` or `.toml` file.
    fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }
}

/// Platform configuration directory for ChainKit, if one exists.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Default bake configuration path: `<config_dir>/chainkit/bake.toml`.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    config_dir()
        .map(|dir| dir.join("bake.toml"))
        .ok_or_else(|| SettingsError::LoadError("no platform config directory".to_string()))
}

/// Default track-path configuration path: `<config_dir>/chainkit/track.toml`.
pub fn default_track_config_path() -> SettingsResult<PathBuf> {
    config_dir()
        .map(|dir| dir.join("track.toml"))
        .ok_or_else(|| SettingsError::LoadError("no platform config directory".to_string()))
}
