//! Error types for the settings crate.
//!
//! Configuration contract violations are the core [`ConfigError`]; this
//! module adds the file handling failures around them.

use chainkit_core::ConfigError;
use std::io;
use thiserror::Error;

/// Errors that can occur while loading or saving configuration files.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The configuration file could not be read.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// The configuration file could not be written.
    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// The file extension is not a supported format.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The configuration failed validation.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<SettingsError> for chainkit_core::Error {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Config(e) => chainkit_core::Error::Config(e),
            SettingsError::Io(e) => chainkit_core::Error::Io(e),
            SettingsError::Json(e) => chainkit_core::Error::Json(e),
            other => chainkit_core::Error::other(other.to_string()),
        }
    }
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
