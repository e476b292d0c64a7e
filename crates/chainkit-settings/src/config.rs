//! Configuration for the chain baker and the track-path generator
//!
//! Bake configuration is organized into logical sections:
//! - Object names (paths, link masters, gear, rig masters, output containers)
//! - Link classification and joint markers
//! - Frame range
//! - Drive model
//! - Rail traversal direction
//! - Secondary-mechanism rig
//! - Driven-part gear-ratio table
//!
//! Every section has defaults, so a config file only needs the keys it changes.

use crate::error::ConfigResult;
use crate::persistence::ConfigFile;
use chainkit_core::{Axis, ConfigError, Error, Vec3};
use chainkit_kinematics::{AngleMap, ControlPoint, Easing, TrackPathParams};
use serde::{Deserialize, Serialize};

fn one() -> f64 {
    1.0
}

fn check_sign(key: &str, value: f64) -> ConfigResult<()> {
    if value == 1.0 || value == -1.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be 1 or -1, got {}", value)))
    }
}

fn check_finite(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, "must be finite"))
    }
}

fn check_name(key: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::invalid(key, "must not be empty"))
    } else {
        Ok(())
    }
}

/// Scene object and output container names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectNames {
    /// Left rail curve
    pub left_path: String,
    /// Right rail curve
    pub right_path: String,
    /// Master shape for ordinary links
    pub link_normal: String,
    /// Master shape for connector links (carries the cam marker)
    pub link_connector: String,
    /// Drive gear
    pub gear: String,
    pub pin: String,
    pub follower: String,
    pub wing: String,
    pub left_container: String,
    pub right_container: String,
    pub rig_container: String,
}

impl Default for ObjectNames {
    fn default() -> Self {
        Self {
            left_path: "TrackPath_L".to_string(),
            right_path: "TrackPath_R".to_string(),
            link_normal: "Link_A".to_string(),
            link_connector: "Link_B".to_string(),
            gear: "Gear".to_string(),
            pin: "CamPin".to_string(),
            follower: "CamFollower".to_string(),
            wing: "Wing".to_string(),
            left_container: "BakedChain_L".to_string(),
            right_container: "BakedChain_R".to_string(),
            rig_container: "BakedCamAndWings".to_string(),
        }
    }
}

/// Link classification and marker names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSettings {
    /// Every `period`-th link is a connector
    pub period: usize,
    /// Connector links satisfy `i % period == special_offset`
    pub special_offset: usize,
    pub joint_start: String,
    pub joint_end: String,
    /// Cam mount marker on the connector master
    pub cam_marker: String,
    /// Hinge marker on the pin and follower masters
    pub hinge_marker: String,
    /// Swap J0/J1 when `J1 - J0` points against `expected_forward`
    pub auto_swap: bool,
    pub expected_forward: [f64; 3],
    /// Joint pitch used when a master has no J0/J1 markers; unset makes
    /// missing markers fatal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_pitch: Option<f64>,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            period: 6,
            special_offset: 0,
            joint_start: "J0".to_string(),
            joint_end: "J1".to_string(),
            cam_marker: "C0".to_string(),
            hinge_marker: "H0".to_string(),
            auto_swap: true,
            expected_forward: [0.0, 1.0, 0.0],
            fallback_pitch: None,
        }
    }
}

impl LinkSettings {
    pub fn expected_forward(&self) -> Vec3 {
        Vec3::from(self.expected_forward)
    }
}

/// Inclusive frame range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameRange {
    pub start: i32,
    pub end: i32,
}

impl Default for FrameRange {
    fn default() -> Self {
        Self { start: 0, end: 250 }
    }
}

impl FrameRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn frames(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How the drive angle is obtained each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriveModel {
    /// Read the gear's rotation about `axis`, relative to the start frame
    DirectRead {
        #[serde(default)]
        axis: Axis,
        #[serde(default = "one")]
        direction_sign: f64,
    },
    /// `frame * speed + phase_offset` radians
    Synthetic {
        speed: f64,
        #[serde(default)]
        phase_offset: f64,
        #[serde(default = "one")]
        direction_sign: f64,
    },
}

impl Default for DriveModel {
    fn default() -> Self {
        Self::DirectRead {
            axis: Axis::X,
            direction_sign: 1.0,
        }
    }
}

impl DriveModel {
    pub fn direction_sign(&self) -> f64 {
        match self {
            Self::DirectRead { direction_sign, .. } | Self::Synthetic { direction_sign, .. } => {
                *direction_sign
            }
        }
    }
}

/// Where the pitch radius comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchRadiusSource {
    /// Chordal formula from link pitch and tooth count
    #[default]
    ToothCount,
    /// Half the gear object's extent across its rotation axis
    GearBounds,
}

/// Drive settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveSettings {
    pub tooth_count: u32,
    pub pitch_radius_source: PitchRadiusSource,
    /// Gear axis used by `gear_bounds` when the model is synthetic
    pub bounds_axis: Axis,
    pub model: DriveModel,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            tooth_count: 40,
            pitch_radius_source: PitchRadiusSource::ToothCount,
            bounds_axis: Axis::X,
            model: DriveModel::default(),
        }
    }
}

impl DriveSettings {
    /// Rotation axis of the gear object.
    pub fn gear_axis(&self) -> Axis {
        match self.model {
            DriveModel::DirectRead { axis, .. } => axis,
            DriveModel::Synthetic { .. } => self.bounds_axis,
        }
    }
}

/// Rail traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailSettings {
    /// Detect the right rail's sign from the path tangents
    pub auto_match_direction: bool,
    pub left_sign: f64,
    /// Used only when auto matching is off
    pub right_sign: f64,
}

impl Default for RailSettings {
    fn default() -> Self {
        Self {
            auto_match_direction: true,
            left_sign: 1.0,
            right_sign: 1.0,
        }
    }
}

/// What a rig part is instantiated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartSource {
    /// Duplicate of the named master shape
    #[default]
    Master,
    /// Plain transform-only empty
    Empty,
}

/// Orientation policy for the wing pivot and followers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WingPolicy {
    /// Shared basis from the lateral axis and the link's forward axis
    TangentRelative,
    /// Shared basis pitched about the lateral axis by a cam profile
    AngleMap {
        #[serde(default)]
        easing: Easing,
        #[serde(default = "one")]
        sign: f64,
        points: Vec<ControlPoint>,
    },
}

impl Default for WingPolicy {
    fn default() -> Self {
        Self::TangentRelative
    }
}

impl WingPolicy {
    /// Build the cam profile, if this policy has one.
    pub fn angle_map(&self) -> ConfigResult<Option<AngleMap>> {
        match self {
            Self::TangentRelative => Ok(None),
            Self::AngleMap { points, easing, .. } => match AngleMap::new(points, *easing) {
                Ok(map) => Ok(Some(map)),
                Err(Error::Config(e)) => Err(e),
                Err(other) => Err(ConfigError::invalid("rig.wing.points", other.to_string())),
            },
        }
    }

    pub fn sign(&self) -> f64 {
        match self {
            Self::TangentRelative => 1.0,
            Self::AngleMap { sign, .. } => *sign,
        }
    }
}

/// Secondary-mechanism rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigSettings {
    pub enabled: bool,
    /// Pin distance from the track centerline
    pub pin_outer_half_distance: f64,
    /// Follower distance from the track centerline
    pub follower_outer_half_distance: f64,
    pub pin_source: PartSource,
    pub follower_source: PartSource,
    pub wing_source: PartSource,
    /// Clamp the wing pivot to world x = 0
    pub force_wing_world_x_zero: bool,
    pub wing: WingPolicy,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            pin_outer_half_distance: 72.0,
            follower_outer_half_distance: 76.0,
            pin_source: PartSource::Master,
            follower_source: PartSource::Master,
            wing_source: PartSource::Master,
            force_wing_world_x_zero: true,
            wing: WingPolicy::default(),
        }
    }
}

/// Gear-ratio table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivenPart {
    pub object: String,
    pub ratio: f64,
    #[serde(default = "one")]
    pub sign: f64,
    #[serde(default)]
    pub axis: Axis,
}

/// Complete bake configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    pub objects: ObjectNames,
    pub links: LinkSettings,
    pub frames: FrameRange,
    pub drive: DriveSettings,
    pub rails: RailSettings,
    pub rig: RigSettings,
    pub driven_parts: Vec<DrivenPart>,
}

impl BakeConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigFile for BakeConfig {
    fn validate(&self) -> ConfigResult<()> {
        let names = &self.objects;
        for (key, value) in [
            ("objects.left_path", &names.left_path),
            ("objects.right_path", &names.right_path),
            ("objects.link_normal", &names.link_normal),
            ("objects.link_connector", &names.link_connector),
            ("objects.gear", &names.gear),
            ("objects.left_container", &names.left_container),
            ("objects.right_container", &names.right_container),
            ("objects.rig_container", &names.rig_container),
        ] {
            check_name(key, value)?;
        }
        if names.left_container == names.right_container
            || names.left_container == names.rig_container
            || names.right_container == names.rig_container
        {
            return Err(ConfigError::invalid(
                "objects",
                "output containers must have distinct names",
            ));
        }

        let links = &self.links;
        if links.period == 0 {
            return Err(ConfigError::invalid("links.period", "must be at least 1"));
        }
        if links.special_offset >= links.period {
            return Err(ConfigError::invalid(
                "links.special_offset",
                format!("must be less than the period ({})", links.period),
            ));
        }
        check_name("links.joint_start", &links.joint_start)?;
        check_name("links.joint_end", &links.joint_end)?;
        if links.expected_forward().norm() < chainkit_core::EPSILON {
            return Err(ConfigError::invalid("links.expected_forward", "must be non-zero"));
        }
        if let Some(pitch) = links.fallback_pitch {
            if pitch.is_nan() || pitch <= 0.0 {
                return Err(ConfigError::invalid("links.fallback_pitch", "must be positive"));
            }
        }

        if self.frames.is_empty() {
            return Err(ConfigError::InvalidFrameRange {
                start: self.frames.start,
                end: self.frames.end,
            });
        }

        if self.drive.tooth_count < 3 {
            return Err(ConfigError::invalid("drive.tooth_count", "must be at least 3"));
        }
        check_sign("drive.model.direction_sign", self.drive.model.direction_sign())?;
        if let DriveModel::Synthetic {
            speed,
            phase_offset,
            ..
        } = self.drive.model
        {
            check_finite("drive.model.speed", speed)?;
            check_finite("drive.model.phase_offset", phase_offset)?;
        }

        check_sign("rails.left_sign", self.rails.left_sign)?;
        check_sign("rails.right_sign", self.rails.right_sign)?;

        let rig = &self.rig;
        if rig.enabled {
            check_name("links.cam_marker", &links.cam_marker)?;
            for (key, value) in [
                ("rig.pin_outer_half_distance", rig.pin_outer_half_distance),
                (
                    "rig.follower_outer_half_distance",
                    rig.follower_outer_half_distance,
                ),
            ] {
                check_finite(key, value)?;
            }
            if rig.pin_source == PartSource::Master {
                check_name("objects.pin", &names.pin)?;
            }
            if rig.follower_source == PartSource::Master {
                check_name("objects.follower", &names.follower)?;
            }
            if rig.wing_source == PartSource::Master {
                check_name("objects.wing", &names.wing)?;
            }
            if rig.pin_source == PartSource::Master || rig.follower_source == PartSource::Master {
                check_name("links.hinge_marker", &links.hinge_marker)?;
            }
            check_sign("rig.wing.sign", rig.wing.sign())?;
            rig.wing.angle_map()?;
        }

        for (index, part) in self.driven_parts.iter().enumerate() {
            check_name(&format!("driven_parts[{}].object", index), &part.object)?;
            check_finite(&format!("driven_parts[{}].ratio", index), part.ratio)?;
            check_sign(&format!("driven_parts[{}].sign", index), part.sign)?;
        }

        Ok(())
    }
}

/// Track-path generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackPathConfig {
    pub gear_a: String,
    pub gear_b: String,
    /// Radial offset added to the estimated gear radius
    pub clearance: f64,
    /// Segments per half circle
    pub arc_samples: usize,
    /// Segments per straight
    pub line_samples: usize,
    /// `1` or `-1`; mirrors the loop to the other side of the center line
    pub side: f64,
    pub output_name: String,
    /// Frame at which the gear poses are read
    pub frame: i32,
}

impl Default for TrackPathConfig {
    fn default() -> Self {
        let params = TrackPathParams::default();
        Self {
            gear_a: "GearA".to_string(),
            gear_b: "GearB".to_string(),
            clearance: params.clearance,
            arc_samples: params.arc_samples,
            line_samples: params.line_samples,
            side: params.side,
            output_name: "TrackPath".to_string(),
            frame: 0,
        }
    }
}

impl TrackPathConfig {
    pub fn params(&self) -> TrackPathParams {
        TrackPathParams {
            clearance: self.clearance,
            arc_samples: self.arc_samples,
            line_samples: self.line_samples,
            side: self.side,
        }
    }
}

impl ConfigFile for TrackPathConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_name("gear_a", &self.gear_a)?;
        check_name("gear_b", &self.gear_b)?;
        check_name("output_name", &self.output_name)?;
        if self.gear_a == self.gear_b {
            return Err(ConfigError::invalid("gear_b", "must differ from gear_a"));
        }
        check_finite("clearance", self.clearance)?;
        if self.arc_samples == 0 {
            return Err(ConfigError::invalid("arc_samples", "must be at least 1"));
        }
        if self.line_samples == 0 {
            return Err(ConfigError::invalid("line_samples", "must be at least 1"));
        }
        check_sign("side", self.side)
    }
}
