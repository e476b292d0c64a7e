//! Stable frame transport.
//!
//! Orthonormal bases built from a forward direction and a carried "up"
//! reference, so that roll about the forward axis stays continuous from one
//! link to the next and from one frame to the next.

use chainkit_core::{quat_from_basis, Quat, Vec3};

/// Projections shorter than this are treated as collinear.
const COLLINEAR_EPSILON: f64 = 1e-6;

/// World up reference, used when no previous up is carried.
pub fn world_up() -> Vec3 {
    Vec3::z()
}

/// Right-handed orthonormal basis.
///
/// As a rotation its columns are `(right, forward, up)`, so local +Y maps to
/// `forward` and local +Z to `up`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub right: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Basis around `forward`, with roll taken from `prev_up`.
    ///
    /// The up reference falls back from `prev_up` to [`world_up`] to +Y when
    /// the candidate is (nearly) parallel to `forward`. A zero `forward` is
    /// replaced by +Y.
    pub fn stable(forward: &Vec3, prev_up: Option<&Vec3>) -> Self {
        let forward = forward
            .try_normalize(chainkit_core::EPSILON)
            .unwrap_or_else(Vec3::y);

        let candidates = [prev_up.copied(), Some(world_up()), Some(Vec3::y())];
        let up = candidates
            .into_iter()
            .flatten()
            .find_map(|reference| {
                let projected = reference - forward * reference.dot(&forward);
                projected.try_normalize(COLLINEAR_EPSILON)
            })
            .unwrap_or_else(Vec3::x);

        let right = forward
            .cross(&up)
            .try_normalize(chainkit_core::EPSILON)
            .unwrap_or_else(Vec3::x);
        let up = right.cross(&forward).normalize();

        Self { right, forward, up }
    }

    /// Basis whose right axis is `lateral`, forward taken from `forward_hint`
    /// made perpendicular to it.
    ///
    /// A zero lateral axis becomes +X and a zero hint +Y. When the hint is
    /// parallel to the lateral axis, up falls back to [`world_up`] and then
    /// +Y, each projected off the lateral axis.
    pub fn from_lateral(lateral: &Vec3, forward_hint: &Vec3) -> Self {
        let right = lateral
            .try_normalize(chainkit_core::EPSILON)
            .unwrap_or_else(Vec3::x);
        let hint = forward_hint
            .try_normalize(chainkit_core::EPSILON)
            .unwrap_or_else(Vec3::y);

        let up = right
            .cross(&hint)
            .try_normalize(COLLINEAR_EPSILON)
            .or_else(|| {
                [world_up(), Vec3::y()].into_iter().find_map(|reference| {
                    let projected = reference - right * reference.dot(&right);
                    projected.try_normalize(COLLINEAR_EPSILON)
                })
            })
            .unwrap_or_else(world_up);
        let forward = up.cross(&right).normalize();

        Self { right, forward, up }
    }

    /// Rotate the basis by `angle` radians about its own right axis.
    pub fn pitched(&self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            right: self.right,
            forward: self.forward * c + self.up * s,
            up: self.up * c - self.forward * s,
        }
    }

    pub fn to_rotation(&self) -> Quat {
        quat_from_basis(&self.right, &self.forward, &self.up)
    }

    /// Largest deviation from orthonormality over norms and pairwise dots.
    pub fn orthonormality_error(&self) -> f64 {
        [
            (self.right.norm() - 1.0).abs(),
            (self.forward.norm() - 1.0).abs(),
            (self.up.norm() - 1.0).abs(),
            self.right.dot(&self.forward).abs(),
            self.right.dot(&self.up).abs(),
            self.forward.dot(&self.up).abs(),
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}
