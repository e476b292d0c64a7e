//! # ChainKit Core
//!
//! Core types, traits, and utilities for ChainKit.
//! Provides the geometric primitives shared by every crate, the error
//! taxonomy used by the bake pipeline, and the contract a host 3D-content
//! application implements so that chains can be baked into its scene.

pub mod error;
pub mod math;
pub mod scene;

pub use error::{ConfigError, Error, GeometryError, Result, SceneError};

pub use math::{quat_from_basis, Axis, Point3, Quat, RigidPose, Vec3, EPSILON};

pub use scene::{
    base_name,
    memory::{CurveData, Keyframe, MemoryScene, RotationKey, SceneDocument, SceneObject},
    ContainerId, EvaluationContext, ObjectId, ObjectKind, SceneHost,
};
