//! # ChainKit
//!
//! Procedural rigid chain/track baking for a host 3D-content application.
//! A rotating gear drives one or two rails of rigid links along closed paths;
//! cam pins, followers and oscillating wings ride on selected links.
//!
//! ## Architecture
//!
//! ChainKit is organized as a workspace with multiple crates:
//!
//! 1. **chainkit-core** - Math types, rigid poses, errors, the host scene contract
//! 2. **chainkit-settings** - Bake and track-path configuration, JSON/TOML persistence
//! 3. **chainkit-kinematics** - Path sampling, frame transport, joint fitting, drive model
//! 4. **chainkit-baker** - Chain, rig and driven-part baking against a host scene
//! 5. **chainkit** - Command-line binary over the in-memory scene

pub use chainkit_baker::{
    bake_scene, BakeReport, BakeResult, ChainBaker, TrackPathGenerator, TrackPathReport,
};
pub use chainkit_core::{Error, MemoryScene, Result, SceneDocument, SceneHost};
pub use chainkit_kinematics::{AngleMap, ControlPoint, Easing, SampledPath};
pub use chainkit_settings::{BakeConfig, ConfigFile, SettingsError, TrackPathConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default `info` level.
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with_level("info")
}

/// Initialize logging.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used as the filter
/// directive. Output goes to stdout with targets and line numbers.
pub fn init_logging_with_level(default_level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)?,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
