//! ChainKit command-line interface.
//!
//! # Commands
//!
//! - `chainkit bake` - Bake chain links, rigs and driven parts into a scene file
//! - `chainkit track-path` - Generate the closed track curve around two gears
//! - `chainkit init-config` - Write a default configuration file

use anyhow::{bail, Context, Result};
use chainkit::{
    init_logging_with_level, BakeConfig, ChainBaker, ConfigFile, MemoryScene, TrackPathConfig,
    TrackPathGenerator,
};
use chainkit_settings::{default_config_path, default_track_config_path};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Procedural chain/track baking
#[derive(Parser)]
#[command(name = "chainkit")]
#[command(about = "Bake rigid chain, cam and wing animation driven by a gear", long_about = None)]
#[command(version = LONG_VERSION)]
struct Cli {
    /// Default log filter when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake both rails, the rigs and the driven parts into a scene
    Bake {
        /// Scene document (JSON)
        #[arg(long)]
        scene: PathBuf,

        /// Bake configuration (.toml or .json); defaults to the user config
        /// file when present, built-in defaults otherwise
        #[arg(long)]
        config: Option<PathBuf>,

        /// Where to write the baked scene; defaults to the input scene
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the bake report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Generate the track path curve around two gears
    TrackPath {
        /// Scene document (JSON)
        #[arg(long)]
        scene: PathBuf,

        /// Track-path configuration (.toml or .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Where to write the scene; defaults to the input scene
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a configuration file with default values
    InitConfig {
        /// Target file; defaults to the user config directory
        #[arg(long)]
        path: Option<PathBuf>,

        /// Write a track-path configuration instead of a bake configuration
        #[arg(long)]
        track: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging_with_level(&cli.log_level)?;

    match cli.command {
        Commands::Bake {
            scene,
            config,
            output,
            report,
        } => bake(&scene, config, output, report),
        Commands::TrackPath {
            scene,
            config,
            output,
        } => track_path(&scene, config, output),
        Commands::InitConfig { path, track, force } => init_config(path, track, force),
    }
}

/// Explicit path, else the default path if it exists, else defaults.
fn load_or_default<C: ConfigFile + Default>(
    explicit: Option<PathBuf>,
    default_path: Option<PathBuf>,
) -> Result<C> {
    let path = match explicit {
        Some(path) => path,
        None => match default_path.filter(|p| p.exists()) {
            Some(path) => path,
            None => {
                info!("No configuration file given, using defaults");
                return Ok(C::default());
            }
        },
    };
    C::load_from_file(&path).with_context(|| format!("Failed to load {}", path.display()))
}

fn load_scene(path: &Path) -> Result<MemoryScene> {
    MemoryScene::load_json(path).with_context(|| format!("Failed to read scene {}", path.display()))
}

fn save_scene(scene: &MemoryScene, path: &Path) -> Result<()> {
    scene
        .save_json(path)
        .with_context(|| format!("Failed to write scene {}", path.display()))
}

fn bake(
    scene_path: &Path,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let config: BakeConfig = load_or_default(config, default_config_path().ok())?;
    let mut scene = load_scene(scene_path)?;

    let report = ChainBaker::new(config)
        .bake(&mut scene)
        .with_context(|| format!("Bake of {} failed", scene_path.display()))?;

    let output = output.unwrap_or_else(|| scene_path.to_path_buf());
    save_scene(&scene, &output)?;
    info!("Wrote baked scene to {}", output.display());

    if let Some(path) = report_path {
        std::fs::write(&path, report.to_json()?)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Wrote bake report to {}", path.display());
    }
    println!("{}", report.summary());
    Ok(())
}

fn track_path(scene_path: &Path, config: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config: TrackPathConfig = load_or_default(config, default_track_config_path().ok())?;
    let mut scene = load_scene(scene_path)?;

    let report = TrackPathGenerator::new(config)
        .generate(&mut scene)
        .context("Track path generation failed")?;

    let output = output.unwrap_or_else(|| scene_path.to_path_buf());
    save_scene(&scene, &output)?;
    println!(
        "{}: {} points, radius {:.4}, length {:.4}",
        report.name,
        report.point_count,
        report.radius,
        report.length()
    );
    Ok(())
}

fn init_config(path: Option<PathBuf>, track: bool, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None if track => default_track_config_path()?,
        None => default_config_path()?,
    };
    if path.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path.display());
    }

    if track {
        TrackPathConfig::default().save_to_file(&path)?;
    } else {
        BakeConfig::default().save_to_file(&path)?;
    }
    println!("Wrote {}", path.display());
    Ok(())
}
