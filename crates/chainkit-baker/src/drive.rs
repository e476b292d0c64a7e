//! Per-frame drive angle.

use chainkit_core::{ObjectId, Result, SceneHost};
use chainkit_kinematics::SyntheticPhase;
use chainkit_settings::{DriveModel, FrameRange};
use tracing::debug;

/// Drive angle `theta` (radians) for every frame of the range.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveTimeline {
    frames: FrameRange,
    thetas: Vec<f64>,
}

impl DriveTimeline {
    /// Sample the drive model over `frames`, advancing the host frame by frame.
    ///
    /// Direct reads are taken relative to the gear angle at the first frame.
    pub fn sample<H: SceneHost + ?Sized>(
        host: &mut H,
        gear: ObjectId,
        model: &DriveModel,
        frames: FrameRange,
    ) -> Result<Self> {
        let thetas = match *model {
            DriveModel::DirectRead { axis, .. } => {
                let start = host.evaluate_at(frames.start);
                let baseline = host.axis_angle(&start, gear, axis)?;
                let mut thetas = Vec::with_capacity(frames.len());
                for frame in frames.frames() {
                    let ctx = host.evaluate_at(frame);
                    thetas.push(host.axis_angle(&ctx, gear, axis)? - baseline);
                }
                thetas
            }
            DriveModel::Synthetic {
                speed,
                phase_offset,
                ..
            } => {
                let phase = SyntheticPhase::new(speed, phase_offset);
                frames.frames().map(|frame| phase.phase(frame)).collect()
            }
        };

        if let (Some(first), Some(last)) = (thetas.first(), thetas.last()) {
            debug!(
                "Drive sampled over {} frames: theta {:.6} -> {:.6}",
                thetas.len(),
                first,
                last
            );
        }
        Ok(Self { frames, thetas })
    }

    /// Timeline from precomputed angles, one per frame starting at `start`.
    pub fn from_thetas(start: i32, thetas: Vec<f64>) -> Self {
        let end = start + thetas.len() as i32 - 1;
        Self {
            frames: FrameRange::new(start, end),
            thetas,
        }
    }

    pub fn frames(&self) -> FrameRange {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.thetas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thetas.is_empty()
    }

    pub fn theta(&self, frame: i32) -> Option<f64> {
        let offset = usize::try_from(frame - self.frames.start).ok()?;
        self.thetas.get(offset).copied()
    }

    /// `(frame, theta)` pairs in frame order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.frames.frames().zip(self.thetas.iter().copied())
    }
}
