//! Cam/wing angle profile.
//!
//! A piecewise angle-vs-position table over one loop traversal. Angles are
//! unwrapped on construction and the last control point is moved to the
//! 360° equivalent of the first, so the profile closes across the loop seam.

use chainkit_core::{ConfigError, Result};
use serde::{Deserialize, Serialize};

const BOUND_TOLERANCE: f64 = 1e-9;

/// One `(position, angle)` entry; position is the normalized loop parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: f64,
    pub angle_deg: f64,
}

impl ControlPoint {
    pub fn new(position: f64, angle_deg: f64) -> Self {
        Self {
            position,
            angle_deg,
        }
    }
}

/// Interpolation between neighbouring control points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    #[default]
    Linear,
    /// `(1 - cos(pi t)) / 2`
    Cosine,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::Cosine => 0.5 * (1.0 - (std::f64::consts::PI * t).cos()),
        }
    }
}

/// Validated, unwrapped angle profile.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleMap {
    positions: Vec<f64>,
    /// Unwrapped degrees
    angles: Vec<f64>,
    easing: Easing,
}

/// Bring `delta` into `[-180, 180]` degrees.
fn wrap_delta(delta: f64) -> f64 {
    delta - 360.0 * (delta / 360.0).round()
}

impl AngleMap {
    /// # Errors
    ///
    /// A [`ConfigError`] when there are fewer than two points, a position or
    /// angle is not finite, the first position is not 0.0 or the last is not
    /// 1.0, or positions decrease.
    pub fn new(points: &[ControlPoint], easing: Easing) -> Result<Self> {
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() >= 2 => (first, last),
            _ => return Err(ConfigError::AngleMapTooShort { found: points.len() }.into()),
        };
        if let Some(index) = points
            .iter()
            .position(|p| !p.position.is_finite() || !p.angle_deg.is_finite())
        {
            return Err(ConfigError::invalid(
                format!("angle_map.points[{}]", index),
                "position and angle must be finite",
            )
            .into());
        }
        if first.position.abs() > BOUND_TOLERANCE || (last.position - 1.0).abs() > BOUND_TOLERANCE
        {
            return Err(ConfigError::AngleMapBounds {
                first: first.position,
                last: last.position,
            }
            .into());
        }
        if let Some(index) = points
            .windows(2)
            .position(|w| w[1].position < w[0].position)
        {
            return Err(ConfigError::AngleMapOrder { index: index + 1 }.into());
        }

        let mut angles = Vec::with_capacity(points.len());
        let mut prev = first.angle_deg;
        angles.push(prev);
        for point in &points[1..] {
            prev += wrap_delta(point.angle_deg - prev);
            angles.push(prev);
        }

        let start = angles[0];
        if let Some(end) = angles.last_mut() {
            *end = start + 360.0 * ((*end - start) / 360.0).round();
        }

        let mut positions: Vec<f64> = points.iter().map(|p| p.position).collect();
        positions[0] = 0.0;
        if let Some(end) = positions.last_mut() {
            *end = 1.0;
        }

        Ok(Self {
            positions,
            angles,
            easing,
        })
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Unwrapped control angles in degrees.
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Angle in degrees at loop parameter `u`, clamped to `[0, 1]`.
    pub fn angle_at(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        let last_segment = self.positions.len() - 2;
        let seg = self
            .positions
            .partition_point(|&p| p <= u)
            .saturating_sub(1)
            .min(last_segment);

        let (p0, p1) = (self.positions[seg], self.positions[seg + 1]);
        let (a0, a1) = (self.angles[seg], self.angles[seg + 1]);
        let span = p1 - p0;
        if span <= BOUND_TOLERANCE {
            return a1;
        }
        let t = self.easing.apply((u - p0) / span);
        a0 + (a1 - a0) * t
    }

    pub fn angle_radians_at(&self, u: f64) -> f64 {
        self.angle_at(u).to_radians()
    }
}
