//! Track path around two equal gears.
//!
//! Builds the closed polyline a chain follows around two equal-radius gears:
//! two 180° arcs joined by two tangent straights, all in the plane spanned by
//! the center line and an automatically chosen in-plane direction.

use chainkit_core::{GeometryError, Point3, Quat, Result, Vec3};
use std::f64::consts::TAU;
use tracing::debug;

/// Gear placement as seen by the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearDisc {
    pub center: Point3,
    /// World rotation of the gear object
    pub rotation: Quat,
    /// Bounding box extents in object space
    pub dimensions: Vec3,
}

impl GearDisc {
    pub fn new(center: Point3, rotation: Quat, dimensions: Vec3) -> Self {
        Self {
            center,
            rotation,
            dimensions,
        }
    }

    /// Radius estimated in the plane `(u, v)`.
    ///
    /// Scores each rotated local axis by how much it lies in the plane and
    /// returns half the larger extent of the two best-scoring axes.
    pub fn radius_in_plane(&self, u: &Vec3, v: &Vec3) -> f64 {
        let mut scored: Vec<(f64, f64)> = [Vec3::x(), Vec3::y(), Vec3::z()]
            .iter()
            .zip(self.dimensions.iter())
            .map(|(axis, extent)| {
                let world = self.rotation * axis;
                (world.dot(u).abs() + world.dot(v).abs(), *extent)
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        0.5 * scored[0].1.max(scored[1].1)
    }
}

/// Sampling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPathParams {
    /// Radial offset added to the estimated gear radius
    pub clearance: f64,
    /// Segments per half circle
    pub arc_samples: usize,
    /// Segments per straight
    pub line_samples: usize,
    /// `+1.0` or `-1.0`; mirrors the loop across the center line
    pub side: f64,
}

impl Default for TrackPathParams {
    fn default() -> Self {
        Self {
            clearance: -1.6,
            arc_samples: 96,
            line_samples: 30,
            side: 1.0,
        }
    }
}

/// Generated loop plus the plane it lies in.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLoop {
    /// Closed loop without a repeated closing point
    pub points: Vec<Point3>,
    pub radius: f64,
    /// Unit direction from the first center to the second
    pub u: Vec3,
    /// In-plane unit direction toward the upper straight
    pub v: Vec3,
}

/// In-plane reference for a center line: +Z unless nearly parallel, then +Y.
fn pick_up_reference(u: &Vec3) -> Vec3 {
    if u.dot(&Vec3::z()).abs() > 0.99 {
        Vec3::y()
    } else {
        Vec3::z()
    }
}

/// Generate the loop around gears `a` and `b`.
///
/// # Errors
///
/// [`GeometryError::CoincidentCenters`] when the centers are closer than
/// 1e-6 and [`GeometryError::NonPositiveRadius`] when the clearance eats the
/// whole radius.
pub fn generate_track_path(a: &GearDisc, b: &GearDisc, params: &TrackPathParams) -> Result<TrackLoop> {
    let d = b.center - a.center;
    let distance = d.norm();
    if distance < 1e-6 {
        return Err(GeometryError::CoincidentCenters { distance }.into());
    }

    let u = d / distance;
    let up_ref = pick_up_reference(&u);
    let n = u.cross(&up_ref).normalize();
    let mut v = n.cross(&u).normalize();
    if params.side < 0.0 {
        v = -v;
    }

    let r1 = a.radius_in_plane(&u, &v);
    let r2 = b.radius_in_plane(&u, &v);
    let radius = 0.5 * (r1 + r2) + params.clearance;
    if radius <= 0.0 {
        return Err(GeometryError::NonPositiveRadius { radius }.into());
    }
    debug!(
        "Track path: gear radii {:.4}/{:.4}, path radius {:.4}, center distance {:.4}",
        r1, r2, radius, distance
    );

    let arc_samples = params.arc_samples.max(1);
    let line_samples = params.line_samples.max(1);

    let c1 = a.center;
    let c2 = b.center;
    let p1_top = c1 + v * radius;
    let p2_top = c2 + v * radius;
    let p1_bot = c1 - v * radius;
    let p2_bot = c2 - v * radius;

    let angle_of = |w: Vec3| w.dot(&v).atan2(w.dot(&u));
    let arc = |center: Point3, from: Point3, to: Point3| -> Vec<Point3> {
        let a0 = angle_of(from - center);
        let mut a1 = angle_of(to - center);
        while a1 <= a0 {
            a1 += TAU;
        }
        (0..=arc_samples)
            .map(|i| {
                let t = i as f64 / arc_samples as f64;
                let angle = a0 + (a1 - a0) * t;
                center + (u * angle.cos() + v * angle.sin()) * radius
            })
            .collect()
    };
    let line_interior = |from: Point3, to: Point3| -> Vec<Point3> {
        (1..line_samples)
            .map(|i| from + (to - from) * (i as f64 / line_samples as f64))
            .collect()
    };

    let mut points = Vec::with_capacity(2 * (arc_samples + line_samples) + 2);
    points.extend(arc(c1, p1_top, p1_bot));
    points.extend(line_interior(p1_bot, p2_bot));
    points.push(p2_bot);
    points.extend(arc(c2, p2_bot, p2_top).into_iter().skip(1));
    points.extend(line_interior(p2_top, p1_top));
    points.push(p1_top);

    if points.len() > 1 && (points[0] - points[points.len() - 1]).norm() < 1e-9 {
        points.pop();
    }

    Ok(TrackLoop {
        points,
        radius,
        u,
        v,
    })
}
