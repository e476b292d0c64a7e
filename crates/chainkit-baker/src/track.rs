//! Track-path generation against a host scene.

use crate::report::TrackPathReport;
use chainkit_core::{EvaluationContext, ObjectId, Point3, Result, SceneHost};
use chainkit_kinematics::{generate_track_path, GearDisc};
use chainkit_settings::{ConfigFile, TrackPathConfig};
use tracing::info;

/// Builds the closed loop around two gears and writes it as a cyclic curve.
#[derive(Debug, Clone)]
pub struct TrackPathGenerator {
    pub config: TrackPathConfig,
}

impl TrackPathGenerator {
    pub fn new(config: TrackPathConfig) -> Self {
        Self { config }
    }

    fn disc<H: SceneHost + ?Sized>(
        host: &H,
        ctx: &EvaluationContext,
        id: ObjectId,
    ) -> Result<GearDisc> {
        let pose = host.world_pose(ctx, id)?;
        Ok(GearDisc::new(
            Point3::from(pose.translation),
            pose.rotation,
            host.dimensions(id)?,
        ))
    }

    /// Generate the loop and replace the output curve.
    pub fn generate<H: SceneHost + ?Sized>(&self, host: &mut H) -> Result<TrackPathReport> {
        self.config.validate()?;
        let ctx = host.evaluate_at(self.config.frame);

        let a = host.find_object(&self.config.gear_a, None)?;
        let b = host.find_object(&self.config.gear_b, None)?;
        let disc_a = Self::disc(host, &ctx, a)?;
        let disc_b = Self::disc(host, &ctx, b)?;

        let track = generate_track_path(&disc_a, &disc_b, &self.config.params())?;
        host.replace_curve(&self.config.output_name, &track.points, true)?;

        let report = TrackPathReport {
            name: self.config.output_name.clone(),
            point_count: track.points.len(),
            radius: track.radius,
            center_distance: (disc_b.center - disc_a.center).norm(),
        };
        info!(
            "Created {} with {} points, radius {:.4}",
            report.name, report.point_count, report.radius
        );
        Ok(report)
    }
}
