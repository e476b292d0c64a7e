//! Error handling for ChainKit
//!
//! Provides the error taxonomy of the bake pipeline:
//! - Scene errors (missing prerequisites in the host scene)
//! - Geometry errors (degenerate input that cannot be substituted)
//! - Configuration errors (contract violations detected at setup time)
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::scene::{ContainerId, ObjectId, ObjectKind};
use thiserror::Error;

/// Scene error type
///
/// Raised when a required named object, child marker, or curve spline is
/// absent from the host scene. These abort a bake before any output is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No object with this name exists
    #[error("Missing object: {name}")]
    MissingObject {
        /// The name that was looked up.
        name: String,
    },

    /// The object exists but is of the wrong kind
    #[error("Object {name} is {actual}, expected {expected}")]
    WrongKind {
        /// The object name.
        name: String,
        /// The kind the caller asked for.
        expected: ObjectKind,
        /// The kind the object actually has.
        actual: ObjectKind,
    },

    /// A required child marker is missing
    #[error("{object} has no child marker named {marker}")]
    MissingMarker {
        /// The parent object name.
        object: String,
        /// The marker base name.
        marker: String,
    },

    /// A curve object carries no spline data
    #[error("Curve {object} has no splines")]
    MissingSpline {
        /// The curve object name.
        object: String,
    },

    /// A curve evaluated to too few points to form a path
    #[error("Curve {object} evaluated to {count} point(s), at least 2 are required")]
    NotEnoughCurvePoints {
        /// The curve object name.
        object: String,
        /// Number of evaluated points.
        count: usize,
    },

    /// A handle does not refer to a live object
    #[error("Unknown object handle {0}")]
    UnknownHandle(ObjectId),

    /// A handle does not refer to a live container
    #[error("Unknown container handle {0}")]
    UnknownContainer(ContainerId),

    /// A read was issued with an evaluation context the host has moved past
    #[error("Stale evaluation context for frame {requested}, host is evaluated at frame {current}")]
    StaleContext {
        /// Frame the context was issued for.
        requested: i32,
        /// Frame the host is currently evaluated at.
        current: i32,
    },

    /// An object with this name already exists
    #[error("Object name already in use: {0}")]
    DuplicateName(String),
}

/// Geometry error type
///
/// Degenerate geometry that cannot be replaced by a fallback vector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Not enough points to build a path or polyline
    #[error("At least {required} points are required, got {found}")]
    InsufficientPoints {
        /// Minimum number of points.
        required: usize,
        /// Number of points supplied.
        found: usize,
    },

    /// All path points coincide
    #[error("Path has zero total length")]
    ZeroLengthPath,

    /// J0 and J1 coincide in the master's local space
    #[error("J0 and J1 are at the same position in link local space")]
    DegenerateJointPair,

    /// The two gear centers coincide
    #[error("Gear centers are too close together (distance {distance})")]
    CoincidentCenters {
        /// Distance between the centers.
        distance: f64,
    },

    /// The track radius after clearance is not positive
    #[error("Track radius must be positive, got {radius}")]
    NonPositiveRadius {
        /// The computed radius.
        radius: f64,
    },
}

/// Configuration error type
///
/// Contract violations in the bake configuration. Detected before any frame
/// is evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The angle map has fewer than two control points
    #[error("Angle map needs at least 2 control points, got {found}")]
    AngleMapTooShort {
        /// Number of control points supplied.
        found: usize,
    },

    /// The angle map does not start at 0.0 and end at 1.0
    #[error("Angle map must span 0.0..=1.0, got {first}..={last}")]
    AngleMapBounds {
        /// Position of the first control point.
        first: f64,
        /// Position of the last control point.
        last: f64,
    },

    /// Control point positions are not non-decreasing
    #[error("Angle map position at index {index} decreases")]
    AngleMapOrder {
        /// Index of the offending control point.
        index: usize,
    },

    /// A configuration value is invalid
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// The frame range is empty
    #[error("Invalid frame range {start}..={end}")]
    InvalidFrameRange {
        /// First frame.
        start: i32,
        /// Last frame.
        end: i32,
    },
}

impl ConfigError {
    /// Create an invalid-value error
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for ChainKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a missing-prerequisite error
    pub fn is_missing_prerequisite(&self) -> bool {
        matches!(self, Error::Scene(_))
    }

    /// Check if this is a configuration-contract violation
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
