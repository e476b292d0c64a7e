//! ChainKit Settings Crate
//!
//! Bake and track-path configuration, JSON/TOML persistence and validation.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    BakeConfig, DriveModel, DriveSettings, DrivenPart, FrameRange, LinkSettings, ObjectNames,
    PartSource, PitchRadiusSource, RailSettings, RigSettings, TrackPathConfig, WingPolicy,
};
pub use error::{ConfigResult, SettingsError, SettingsResult};
pub use persistence::{
    config_dir, default_config_path, default_track_config_path, ConfigFile, ConfigFormat,
};
