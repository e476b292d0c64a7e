//! Secondary-mechanism rig baker.
//!
//! Pins, followers, the wing pivot and the wing are derived from the baked
//! poses of a left/right connector pair. Nothing here is authored directly:
//! every output is a function of the two link poses and the loop parameter.

use crate::chain::RailBake;
use crate::setup::{BakeSetup, RigSetup};
use chainkit_core::{Point3, RigidPose, Vec3, EPSILON};
use chainkit_kinematics::Basis;
use tracing::{debug, warn};

/// Derived poses of one rig at one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigFrame {
    pub pin_left: RigidPose,
    pub pin_right: RigidPose,
    pub follower_left: RigidPose,
    pub follower_right: RigidPose,
    pub pivot: RigidPose,
    pub wing: RigidPose,
}

/// Baked frames of the rig on ring index `link_index`
#[derive(Debug, Clone, PartialEq)]
pub struct RigTrack {
    pub link_index: usize,
    pub frames: Vec<RigFrame>,
}

/// Lateral unit axis and half-separation between the two cam points.
fn lateral(cam_left: &Point3, cam_right: &Point3) -> (Vec3, f64) {
    let across = cam_right - cam_left;
    let separation = across.norm();
    if separation < EPSILON {
        (Vec3::x(), 0.0)
    } else {
        (across / separation, separation * 0.5)
    }
}

impl RigSetup {
    /// Solve the rig for one frame.
    ///
    /// `u` is the normalized loop parameter of the connector, used only by
    /// the angle-map wing policy.
    pub fn solve(&self, left: &RigidPose, right: &RigidPose, u: f64) -> RigFrame {
        let cam_left = left.transform_point(&self.cam_local);
        let cam_right = right.transform_point(&self.cam_local);
        let (x_hat, half) = lateral(&cam_left, &cam_right);

        let pin_push = self.pin_outer_half_distance - half;
        let follower_push = self.follower_outer_half_distance - half;

        let pin_hinge = self.pin.hinge();
        let pin_left = RigidPose::pinned(left.rotation, &pin_hinge, &(cam_left - x_hat * pin_push));
        let pin_right =
            RigidPose::pinned(right.rotation, &pin_hinge, &(cam_right + x_hat * pin_push));

        // One basis for the pivot and both followers.
        let forward_hint = left.rotation * self.link_forward_local;
        let mut basis = Basis::from_lateral(&x_hat, &forward_hint);
        if let Some(map) = &self.angle_map {
            basis = basis.pitched(self.wing_sign * map.angle_radians_at(u));
        }
        let rotation = basis.to_rotation();

        let follower_hinge = self.follower.hinge();
        let follower_left = RigidPose::pinned(
            rotation,
            &follower_hinge,
            &(cam_left - x_hat * follower_push),
        );
        let follower_right = RigidPose::pinned(
            rotation,
            &follower_hinge,
            &(cam_right + x_hat * follower_push),
        );

        let mut mid = Point3::from((cam_left.coords + cam_right.coords) * 0.5);
        if self.force_wing_world_x_zero {
            mid.x = 0.0;
        }
        let pivot = RigidPose::new(mid.coords, rotation);
        let wing = RigidPose::pinned(rotation, &self.wing.hinge(), &mid);

        RigFrame {
            pin_left,
            pin_right,
            follower_left,
            follower_right,
            pivot,
            wing,
        }
    }
}

/// Bake every rig over the frames of the two rail bakes.
pub fn bake_rigs(
    setup: &BakeSetup,
    rig: &RigSetup,
    left: &RailBake,
    right: &RailBake,
) -> Vec<RigTrack> {
    let frame_count = left.frame_count().min(right.frame_count());
    if left.frame_count() != right.frame_count() {
        warn!(
            "Rail bakes differ in length ({} vs {}); rigs use {} frames",
            left.frame_count(),
            right.frame_count(),
            frame_count
        );
    }

    let tracks: Vec<RigTrack> = setup
        .connector_indices()
        .into_iter()
        .map(|index| {
            let frames = (0..frame_count)
                .filter_map(|offset| {
                    let l = left.pose(offset, index)?;
                    let r = right.pose(offset, index)?;
                    let distance = setup
                        .left
                        .target_distance(index, setup.pitch, left.traveled[offset]);
                    let u = setup.left.path.loop_parameter(distance);
                    Some(rig.solve(l, r, u))
                })
                .collect();
            RigTrack {
                link_index: index,
                frames,
            }
        })
        .collect();

    debug!("Baked {} rigs over {} frames", tracks.len(), frame_count);
    tracks
}
