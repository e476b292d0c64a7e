//! # ChainKit Baker
//!
//! Bakes rigid chain animation into a host scene:
//!
//! - **Setup**: resolves names, markers and curves once, failing before any
//!   output is touched
//! - **Chain loop**: places both rails' links every frame with the two-joint
//!   fitter and a carried up vector
//! - **Rig baker**: pins, followers, wing pivot and wing on connector links
//! - **Driven parts**: gear-ratio rotation keys for auxiliary gears
//! - **Track path**: closed loop around two gears written as a curve
//!
//! A bake is computed completely before the first host write.

pub mod chain;
pub mod drive;
pub mod driven;
pub mod output;
pub mod report;
pub mod rig;
pub mod setup;
pub mod track;

pub use chain::{bake_rail, RailBake, RailPlacer, UpState};
pub use drive::DriveTimeline;
pub use driven::{bake_driven, DrivenTrack};
pub use output::{output_names, Containers, OutputWriter, Side};
pub use report::{BakeReport, TrackPathReport};
pub use rig::{bake_rigs, RigFrame, RigTrack};
pub use setup::{BakeSetup, LinkClassifier, LinkKind, MasterShape, PartTemplate, Rail, RigSetup};
pub use track::TrackPathGenerator;

use chainkit_core::{Result, SceneHost};
use chainkit_kinematics::ChainDrive;
use chainkit_settings::BakeConfig;
use tracing::info;

/// Every pose of a bake, not yet written
#[derive(Debug, Clone)]
pub struct BakeResult {
    pub setup: BakeSetup,
    pub timeline: DriveTimeline,
    pub left: RailBake,
    pub right: RailBake,
    pub rigs: Vec<RigTrack>,
    pub driven: Vec<DrivenTrack>,
}

/// Chain bake driver
#[derive(Debug, Clone)]
pub struct ChainBaker {
    pub config: BakeConfig,
}

impl ChainBaker {
    pub fn new(config: BakeConfig) -> Self {
        Self { config }
    }

    /// Compute every pose of the bake. Only evaluates the host.
    pub fn compute<H: SceneHost + ?Sized>(&self, host: &mut H) -> Result<BakeResult> {
        let setup = BakeSetup::resolve(host, &self.config)?;
        let timeline =
            DriveTimeline::sample(host, setup.gear, &self.config.drive.model, self.config.frames)?;
        let drive = ChainDrive::new(setup.pitch_radius, self.config.drive.model.direction_sign());

        let left = bake_rail(&setup, &setup.left, &timeline, &drive);
        let right = bake_rail(&setup, &setup.right, &timeline, &drive);
        let rigs = match &setup.rig {
            Some(rig) => bake_rigs(&setup, rig, &left, &right),
            None => Vec::new(),
        };
        let driven = bake_driven(&setup.driven, &timeline);

        Ok(BakeResult {
            setup,
            timeline,
            left,
            right,
            rigs,
            driven,
        })
    }

    /// Compute, then write every instance and keyframe into the host.
    pub fn bake<H: SceneHost + ?Sized>(&self, host: &mut H) -> Result<BakeReport> {
        let result = self.compute(host)?;
        let setup = &result.setup;

        let mut writer = OutputWriter::new(host, self.config.frames);
        writer.check_names(&self.config.objects, &output_names(setup, &result.rigs))?;
        let containers = writer.prepare(&self.config.objects)?;
        writer.write_rail(Side::Left, setup, &result.left, containers.left)?;
        writer.write_rail(Side::Right, setup, &result.right, containers.right)?;
        writer.write_rigs(setup, &result.rigs, containers.rig)?;
        writer.write_driven(&result.driven)?;

        let report = BakeReport {
            baked_at: chrono::Utc::now(),
            frame_start: self.config.frames.start,
            frame_end: self.config.frames.end,
            frame_count: result.timeline.len(),
            link_count: setup.link_count,
            pitch: setup.pitch,
            pitch_radius: setup.pitch_radius,
            left_length: setup.left.path.total_length(),
            right_length: setup.right.path.total_length(),
            left_sign: setup.left.direction_sign,
            right_sign: setup.right.direction_sign,
            connector_indices: setup.connector_indices(),
            rig_count: result.rigs.len(),
            driven_parts: result.driven.iter().map(|d| d.name.clone()).collect(),
            objects_created: writer.objects_created,
            objects_cleared: writer.objects_cleared,
            keyframes_written: writer.keyframes_written,
        };
        info!("{}", report.summary());
        Ok(report)
    }
}

/// Bake `config` into `host`.
pub fn bake_scene<H: SceneHost + ?Sized>(host: &mut H, config: &BakeConfig) -> Result<BakeReport> {
    ChainBaker::new(config.clone()).bake(host)
}
