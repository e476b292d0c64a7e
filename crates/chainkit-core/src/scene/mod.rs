//! Host scene contract
//!
//! The host 3D-content application owns the scene graph, curve evaluation and
//! keyframe storage. ChainKit talks to it only through [`SceneHost`], with
//! names resolved once into typed handles and every time-dependent read
//! tied to an explicit [`EvaluationContext`].

pub mod memory;

use crate::error::{Result, SceneError};
use crate::math::{Axis, Point3, RigidPose, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a host object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable handle to a named output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub usize);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

/// Kind of a host object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Curve with spline data
    Curve,
    /// Mesh with shared geometry
    Mesh,
    /// Transform-only marker
    Empty,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curve => write!(f, "CURVE"),
            Self::Mesh => write!(f, "MESH"),
            Self::Empty => write!(f, "EMPTY"),
        }
    }
}

/// Token for reads at one evaluated frame.
///
/// Issued by [`SceneHost::evaluate_at`]; a host rejects reads made with a
/// context it has since moved past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationContext {
    frame: i32,
    generation: u64,
}

impl EvaluationContext {
    pub fn new(frame: i32, generation: u64) -> Self {
        Self { frame, generation }
    }

    pub fn frame(&self) -> i32 {
        self.frame
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Strip a host-added distinguishing suffix: `J0.001` -> `J0`.
pub fn base_name(name: &str) -> &str {
    name.split_once('.').map_or(name, |(base, _)| base)
}

/// Operations the bake pipeline needs from the host application.
pub trait SceneHost {
    /// Resolve a name, optionally checking the object kind.
    fn find_object(&self, name: &str, expected: Option<ObjectKind>) -> Result<ObjectId>;

    fn object_name(&self, id: ObjectId) -> Result<&str>;

    fn object_kind(&self, id: ObjectId) -> Result<ObjectKind>;

    fn children(&self, id: ObjectId) -> Result<Vec<ObjectId>>;

    /// Name of the container the object is linked into, if any.
    fn container_of(&self, id: ObjectId) -> Result<Option<&str>>;

    /// Translation relative to the parent object.
    fn local_translation(&self, id: ObjectId) -> Result<Vec3>;

    /// Bounding box extents in object space.
    fn dimensions(&self, id: ObjectId) -> Result<Vec3>;

    /// Advance the scene to `frame` and re-evaluate dependencies.
    fn evaluate_at(&mut self, frame: i32) -> EvaluationContext;

    fn world_pose(&self, ctx: &EvaluationContext, id: ObjectId) -> Result<RigidPose>;

    /// Euler rotation component (radians) about a local axis.
    fn axis_angle(&self, ctx: &EvaluationContext, id: ObjectId, axis: Axis) -> Result<f64>;

    /// Tessellated polyline of the first spline, in world space, with any
    /// deformation applied. The closing point is not repeated.
    fn curve_polyline(&self, ctx: &EvaluationContext, id: ObjectId) -> Result<Vec<Point3>>;

    fn ensure_container(&mut self, name: &str) -> Result<ContainerId>;

    /// Delete every object in the container. Returns the number removed.
    fn clear_container(&mut self, container: ContainerId) -> Result<usize>;

    /// New instance sharing the source geometry, with animation stripped.
    fn duplicate_into(
        &mut self,
        source: ObjectId,
        name: &str,
        container: ContainerId,
    ) -> Result<ObjectId>;

    fn new_empty(&mut self, name: &str, container: ContainerId) -> Result<ObjectId>;

    fn insert_keyframe(&mut self, id: ObjectId, frame: i32, pose: &RigidPose) -> Result<()>;

    /// Create a curve object, replacing any object already using the name.
    fn replace_curve(&mut self, name: &str, points: &[Point3], cyclic: bool) -> Result<ObjectId>;

    /// Local position of the first child whose base name is `marker`.
    fn find_marker(&self, parent: ObjectId, marker: &str) -> Result<Option<Point3>> {
        for child in self.children(parent)? {
            if base_name(self.object_name(child)?) == marker {
                return Ok(Some(Point3::from(self.local_translation(child)?)));
            }
        }
        Ok(None)
    }

    /// Like [`SceneHost::find_marker`] but a missing marker is an error.
    fn require_marker(&self, parent: ObjectId, marker: &str) -> Result<Point3> {
        match self.find_marker(parent, marker)? {
            Some(p) => Ok(p),
            None => Err(SceneError::MissingMarker {
                object: self.object_name(parent)?.to_string(),
                marker: marker.to_string(),
            }
            .into()),
        }
    }
}
