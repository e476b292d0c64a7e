//! Gear/chain drive model.
//!
//! Turns a gear rotation angle into linear travel along the chain path and
//! maps the master phase onto coupled parts through a fixed ratio table.

use chainkit_core::{Axis, ConfigError, Quat, Result, RigidPose, Vec3};
use std::f64::consts::PI;

/// Sprocket pitch radius for a chain of `pitch` on a gear with `tooth_count`
/// teeth: `pitch / (2 sin(pi / teeth))`.
///
/// # Errors
///
/// [`ConfigError::InvalidValue`] for fewer than 3 teeth or a non-positive
/// pitch.
pub fn pitch_radius(pitch: f64, tooth_count: u32) -> Result<f64> {
    if tooth_count < 3 {
        return Err(ConfigError::invalid("drive.tooth_count", "must be at least 3").into());
    }
    if pitch.is_nan() || pitch <= 0.0 {
        return Err(ConfigError::invalid("pitch", format!("must be positive, got {}", pitch)).into());
    }
    Ok(pitch / (2.0 * (PI / tooth_count as f64).sin()))
}

/// Radius estimate from a gear's bounding box: half the largest extent
/// across the rotation axis.
pub fn radius_from_dimensions(dimensions: &Vec3, axis: Axis) -> f64 {
    let across = match axis {
        Axis::X => dimensions.y.max(dimensions.z),
        Axis::Y => dimensions.x.max(dimensions.z),
        Axis::Z => dimensions.x.max(dimensions.y),
    };
    0.5 * across
}

/// Synthetic master phase `frame * speed + phase_offset`, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticPhase {
    pub speed: f64,
    pub phase_offset: f64,
}

impl SyntheticPhase {
    pub fn new(speed: f64, phase_offset: f64) -> Self {
        Self {
            speed,
            phase_offset,
        }
    }

    pub fn phase(&self, frame: i32) -> f64 {
        f64::from(frame) * self.speed + self.phase_offset
    }
}

/// Angle-to-travel conversion for one chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainDrive {
    pub pitch_radius: f64,
    /// `+1.0` or `-1.0`
    pub direction_sign: f64,
}

impl ChainDrive {
    pub fn new(pitch_radius: f64, direction_sign: f64) -> Self {
        Self {
            pitch_radius,
            direction_sign,
        }
    }

    /// Linear travel along the path for a drive angle `theta`.
    pub fn traveled(&self, theta: f64) -> f64 {
        theta * self.pitch_radius * self.direction_sign
    }

    /// Drive angle for one full loop of a path of `length`.
    pub fn angle_per_loop(&self, length: f64) -> f64 {
        length / self.pitch_radius
    }
}

/// Visual rotation of a part coupled to the master phase.
///
/// This is a ratio table entry, not a tooth-mesh solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearCoupling {
    pub ratio: f64,
    pub sign: f64,
    pub axis: Axis,
}

impl GearCoupling {
    pub fn new(ratio: f64, sign: f64, axis: Axis) -> Self {
        Self { ratio, sign, axis }
    }

    /// Part angle for master phase `theta`.
    pub fn angle(&self, theta: f64) -> f64 {
        theta * self.ratio * self.sign
    }

    /// Rotation about the part's local axis for master phase `theta`.
    pub fn rotation(&self, theta: f64) -> Quat {
        Quat::from_scaled_axis(self.axis.unit() * self.angle(theta))
    }

    /// `rest` with the coupled rotation applied in local space.
    pub fn pose(&self, rest: &RigidPose, theta: f64) -> RigidPose {
        RigidPose::new(rest.translation, rest.rotation * self.rotation(theta))
    }
}
