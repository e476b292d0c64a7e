//! Geometric primitives
//!
//! Thin aliases over `nalgebra` plus the rigid pose type that every baked
//! object carries per frame.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// World or local position
pub type Point3 = nalgebra::Point3<f64>;
/// Direction or offset
pub type Vec3 = Vector3<f64>;
/// Unit rotation
pub type Quat = UnitQuaternion<f64>;

/// Length below which a vector is treated as zero
pub const EPSILON: f64 = 1e-9;

/// Principal rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "x", alias = "X")]
    X,
    #[serde(rename = "y", alias = "Y")]
    Y,
    #[serde(rename = "z", alias = "Z")]
    Z,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::x(),
            Axis::Y => Vec3::y(),
            Axis::Z => Vec3::z(),
        }
    }

    /// Component index (x = 0, y = 1, z = 2)
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::X
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            _ => Err(format!("Unknown axis: {}", s)),
        }
    }
}

/// Rotation + translation, no scale or shear.
///
/// Maps a local point `p` to `rotation * p + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for RigidPose {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidPose {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }

    /// Pose whose rotation is `rotation` and which sends `local` onto `world`.
    pub fn pinned(rotation: Quat, local: &Point3, world: &Point3) -> Self {
        let translation = world.coords - rotation * local.coords;
        Self::new(translation, rotation)
    }

    pub fn position(&self) -> Point3 {
        Point3::from(self.translation)
    }

    pub fn transform_point(&self, p: &Point3) -> Point3 {
        Point3::from(self.rotation * p.coords + self.translation)
    }

    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        self.rotation * v
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &RigidPose) -> RigidPose {
        RigidPose::new(
            self.rotation * other.translation + self.translation,
            self.rotation * other.rotation,
        )
    }

    pub fn inverse(&self) -> RigidPose {
        let inv = self.rotation.inverse();
        RigidPose::new(-(inv * self.translation), inv)
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// Component-wise comparison of translation and rotation angle.
    ///
    /// The angle comes from the vector part of the relative rotation, which
    /// stays accurate near zero where `acos` of the scalar part does not.
    pub fn approx_eq(&self, other: &RigidPose, tolerance: f64) -> bool {
        let delta = self.rotation.inverse() * other.rotation;
        let angle = 2.0 * delta.imag().norm().min(1.0).asin();
        (self.translation - other.translation).norm() <= tolerance && angle <= tolerance
    }
}

/// Rotation whose columns are the given orthonormal axes.
pub fn quat_from_basis(x: &Vec3, y: &Vec3, z: &Vec3) -> Quat {
    let m = Matrix3::from_columns(&[*x, *y, *z]);
    Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(m))
}
