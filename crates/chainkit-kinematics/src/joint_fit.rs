//! Two-joint rigid fitting.
//!
//! Places a rigid master shape so that its two hinge markers land exactly on
//! two world targets, with roll resolved by the transported up vector.

use crate::frame::{world_up, Basis};
use chainkit_core::{GeometryError, Point3, Result, RigidPose, Vec3, EPSILON};

/// Hinge markers J0/J1 in a master shape's local space.
///
/// Only built through [`JointPair::new`], so the markers never coincide:
///
/// ```compile_fail
/// use chainkit_core::Point3;
/// use chainkit_kinematics::JointPair;
///
/// let p = Point3::origin();
/// let _ = JointPair { j0: p, j1: p };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPair {
    j0: Point3,
    j1: Point3,
}

impl JointPair {
    /// # Errors
    ///
    /// [`GeometryError::DegenerateJointPair`] if the markers coincide.
    pub fn new(j0: Point3, j1: Point3) -> Result<Self> {
        if (j1 - j0).norm() < EPSILON {
            return Err(GeometryError::DegenerateJointPair.into());
        }
        Ok(Self { j0, j1 })
    }

    pub fn j0(&self) -> Point3 {
        self.j0
    }

    pub fn j1(&self) -> Point3 {
        self.j1
    }

    /// Default pair along local +Y: `J0 = 0`, `J1 = (0, pitch, 0)`.
    pub fn along_y(pitch: f64) -> Result<Self> {
        Self::new(Point3::origin(), Point3::new(0.0, pitch, 0.0))
    }

    pub fn pitch(&self) -> f64 {
        (self.j1 - self.j0).norm()
    }

    /// Unit local forward `J1 - J0`.
    pub fn forward(&self) -> Vec3 {
        (self.j1 - self.j0).normalize()
    }

    /// Swap the markers when `J1 - J0` points against `expected_forward`.
    pub fn oriented(self, expected_forward: &Vec3) -> Self {
        if (self.j1 - self.j0).dot(expected_forward) < 0.0 {
            Self {
                j0: self.j1,
                j1: self.j0,
            }
        } else {
            self
        }
    }
}

/// Fitted pose plus the up vector to carry into the next fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointFit {
    pub pose: RigidPose,
    pub up: Vec3,
}

/// Rigid pose sending the pair's `J0` to `p0` and `J1` toward `p1`.
///
/// `J0` lands on `p0` exactly; `J1` lands on `p1` whenever the target chord
/// equals the joint pitch. Coincident targets use a +Y forward instead of
/// failing.
pub fn fit_rigid(p0: &Point3, p1: &Point3, joints: &JointPair, prev_up: Option<&Vec3>) -> JointFit {
    let world = Basis::stable(&(p1 - p0), prev_up);
    let local_up = world_up();
    let local = Basis::stable(&joints.forward(), Some(&local_up));

    let rotation = world.to_rotation() * local.to_rotation().inverse();
    JointFit {
        pose: RigidPose::pinned(rotation, &joints.j0(), p0),
        up: world.up,
    }
}
