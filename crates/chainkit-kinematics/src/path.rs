//! Arc-length sampled closed paths.
//!
//! A [`SampledPath`] is built once per bake from a curve's tessellated
//! polyline and answers "where is distance `d` along the loop" in
//! O(log n). Distances wrap, so the path behaves as a topological circle.

use chainkit_core::{GeometryError, Point3, Result, Vec3, EPSILON};
use tracing::trace;

/// Closed polyline with a cumulative arc-length table.
///
/// # Example
///
/// ```
/// use chainkit_core::Point3;
/// use chainkit_kinematics::SampledPath;
///
/// let path = SampledPath::build(&[
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(4.0, 0.0, 0.0),
///     Point3::new(4.0, 4.0, 0.0),
///     Point3::new(0.0, 4.0, 0.0),
/// ])
/// .unwrap();
///
/// assert!((path.total_length() - 16.0).abs() < 1e-12);
/// let p = path.distance_to_world(18.0);
/// assert!((p - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPath {
    /// Vertices with the first one repeated at the end.
    points: Vec<Point3>,
    segment_lengths: Vec<f64>,
    /// `cumulative[i]` is the arc length at `points[i]`.
    cumulative: Vec<f64>,
    total_length: f64,
}

impl SampledPath {
    /// Build a closed path from an open loop of points.
    ///
    /// A trailing point equal to the first one is accepted and not doubled.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InsufficientPoints`] for fewer than 2 points and
    /// [`GeometryError::ZeroLengthPath`] when every point coincides.
    pub fn build(points: &[Point3]) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::InsufficientPoints {
                required: 2,
                found: points.len(),
            }
            .into());
        }

        let mut closed = points.to_vec();
        let first = closed[0];
        let already_closed = closed
            .last()
            .is_some_and(|last| (last - first).norm() <= EPSILON);
        if !already_closed {
            closed.push(first);
        }
        if closed.len() < 3 {
            return Err(GeometryError::InsufficientPoints {
                required: 2,
                found: closed.len() - 1,
            }
            .into());
        }

        let segment_lengths: Vec<f64> = closed.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
        let mut cumulative = Vec::with_capacity(closed.len());
        let mut acc = 0.0;
        cumulative.push(acc);
        for len in &segment_lengths {
            acc += len;
            cumulative.push(acc);
        }

        if acc <= EPSILON {
            return Err(GeometryError::ZeroLengthPath.into());
        }

        trace!(
            "Sampled path: {} segments, length {:.6}",
            segment_lengths.len(),
            acc
        );

        Ok(Self {
            points: closed,
            segment_lengths,
            cumulative,
            total_length: acc,
        })
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    /// Vertices, closing point included.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.cumulative
    }

    /// Wrap a distance into `[0, total_length)`.
    pub fn wrap(&self, distance: f64) -> f64 {
        let t = distance.rem_euclid(self.total_length);
        if t >= self.total_length {
            0.0
        } else {
            t
        }
    }

    /// Normalized loop parameter in `[0, 1)` for a distance.
    pub fn loop_parameter(&self, distance: f64) -> f64 {
        self.wrap(distance) / self.total_length
    }

    /// World position at arc distance `distance`, modulo the loop length.
    pub fn distance_to_world(&self, distance: f64) -> Point3 {
        let t = self.wrap(distance);
        let last = self.segment_lengths.len() - 1;
        let seg = self
            .cumulative
            .partition_point(|&c| c <= t)
            .saturating_sub(1)
            .min(last);

        let a = self.points[seg];
        let len = self.segment_lengths[seg];
        if len <= EPSILON {
            return a;
        }
        let u = (t - self.cumulative[seg]) / len;
        a + (self.points[seg + 1] - a) * u
    }

    /// Unit chord direction from `from` to `to`, if the chord is not degenerate.
    pub fn chord_direction(&self, from: f64, to: f64) -> Option<Vec3> {
        let chord = self.distance_to_world(to) - self.distance_to_world(from);
        let len = chord.norm();
        (len >= EPSILON).then(|| chord / len)
    }
}

/// Traversal sign for `other` so that it advances like `reference`.
///
/// Compares the chord directions over `[0, probe]` on both paths and returns
/// `-1.0` when they point against each other, `+1.0` otherwise (including
/// when either chord is degenerate).
pub fn direction_sign_match(reference: &SampledPath, other: &SampledPath, probe: f64) -> f64 {
    let (Some(a), Some(b)) = (
        reference.chord_direction(0.0, probe),
        other.chord_direction(0.0, probe),
    ) else {
        return 1.0;
    };
    if a.dot(&b) < 0.0 {
        -1.0
    } else {
        1.0
    }
}
