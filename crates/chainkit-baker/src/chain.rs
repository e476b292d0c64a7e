//! Chain baking loop.
//!
//! For every frame, places every link of a rail on the sampled path with the
//! two-joint fitter. The transported up vector is explicit state: one entry
//! per link index, threaded by value from frame to frame.

use crate::drive::DriveTimeline;
use crate::setup::{BakeSetup, Rail};
use chainkit_core::{Point3, RigidPose, Vec3};
use chainkit_kinematics::{fit_rigid, ChainDrive, JointPair};
use tracing::trace;

/// Up vectors carried per link index between frames.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpState {
    per_link: Vec<Option<Vec3>>,
}

impl UpState {
    /// Empty state for a ring of `count` links.
    pub fn new(count: usize) -> Self {
        Self {
            per_link: vec![None; count],
        }
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.per_link.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.per_link.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_link.is_empty()
    }
}

/// Places one rail's links for a given drive travel.
#[derive(Debug, Clone)]
pub struct RailPlacer<'a> {
    rail: &'a Rail,
    pitch: f64,
    /// Joint pair per link index
    shapes: Vec<&'a JointPair>,
}

impl<'a> RailPlacer<'a> {
    pub fn new(rail: &'a Rail, pitch: f64, shapes: Vec<&'a JointPair>) -> Self {
        Self {
            rail,
            pitch,
            shapes,
        }
    }

    pub fn from_setup(setup: &'a BakeSetup, rail: &'a Rail) -> Self {
        let shapes = (0..setup.link_count)
            .map(|i| &setup.shape(i).joints)
            .collect();
        Self::new(rail, setup.pitch, shapes)
    }

    pub fn link_count(&self) -> usize {
        self.shapes.len()
    }

    /// Hinge targets of every link; link `i` spans targets `i` and `i + 1`.
    pub fn targets(&self, traveled: f64) -> Vec<Point3> {
        (0..self.link_count())
            .map(|i| self.rail.target(i, self.pitch, traveled))
            .collect()
    }

    /// Poses of every link after `traveled` units of travel.
    ///
    /// Each link takes its own up vector from `ups`; a link without one
    /// takes the up vector of the previous link in ring order.
    pub fn place(&self, traveled: f64, mut ups: UpState) -> (Vec<RigidPose>, UpState) {
        let count = self.link_count();
        if ups.len() != count {
            ups = UpState::new(count);
        }

        let targets = self.targets(traveled);
        let mut poses = Vec::with_capacity(count);
        let mut ring_up: Option<Vec3> = None;
        for (i, joints) in self.shapes.iter().enumerate() {
            let hint = ups.get(i).or(ring_up);
            let fit = fit_rigid(&targets[i], &targets[(i + 1) % count], joints, hint.as_ref());
            ups.per_link[i] = Some(fit.up);
            ring_up = Some(fit.up);
            poses.push(fit.pose);
        }
        (poses, ups)
    }
}

/// Baked poses of one rail, frame-major.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RailBake {
    /// `poses[frame_offset][link]`
    pub poses: Vec<Vec<RigidPose>>,
    /// Drive travel per frame offset
    pub traveled: Vec<f64>,
}

impl RailBake {
    pub fn frame_count(&self) -> usize {
        self.poses.len()
    }

    pub fn pose(&self, frame_offset: usize, link: usize) -> Option<&RigidPose> {
        self.poses.get(frame_offset)?.get(link)
    }

    /// Pose track of one link across all frames.
    pub fn link_track(&self, link: usize) -> impl Iterator<Item = &RigidPose> + '_ {
        self.poses.iter().filter_map(move |frame| frame.get(link))
    }
}

/// Bake every frame of `timeline` for one rail.
pub fn bake_rail(
    setup: &BakeSetup,
    rail: &Rail,
    timeline: &DriveTimeline,
    drive: &ChainDrive,
) -> RailBake {
    let placer = RailPlacer::from_setup(setup, rail);
    let mut ups = UpState::new(placer.link_count());
    let mut bake = RailBake {
        poses: Vec::with_capacity(timeline.len()),
        traveled: Vec::with_capacity(timeline.len()),
    };

    for (frame, theta) in timeline.iter() {
        let traveled = drive.traveled(theta);
        let (poses, next) = placer.place(traveled, ups);
        ups = next;
        trace!("Frame {}: traveled {:.6}", frame, traveled);
        bake.poses.push(poses);
        bake.traveled.push(traveled);
    }
    bake
}
