//! Bake setup.
//!
//! Resolves every name in the configuration into a typed handle once, reads
//! the markers and curves the bake depends on, and fails before any output is
//! touched when a prerequisite is missing.

use chainkit_core::{
    EvaluationContext, ObjectId, ObjectKind, Point3, Result, RigidPose, SceneError, SceneHost, Vec3,
};
use chainkit_kinematics::{
    direction_sign_match, pitch_radius, radius_from_dimensions, AngleMap, GearCoupling, JointPair,
    SampledPath,
};
use chainkit_settings::{BakeConfig, ConfigFile, LinkSettings, PartSource, PitchRadiusSource};
use tracing::{debug, info, warn};

const PITCH_MISMATCH_TOLERANCE: f64 = 1e-4;

/// Which master a link instance is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Normal,
    /// Carries the cam mount of a rig
    Connector,
}

/// `i % period == offset` selects connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkClassifier {
    period: usize,
    offset: usize,
}

impl LinkClassifier {
    pub fn new(period: usize, offset: usize) -> Self {
        Self {
            period: period.max(1),
            offset,
        }
    }

    pub fn classify(&self, index: usize) -> LinkKind {
        if index % self.period == self.offset {
            LinkKind::Connector
        } else {
            LinkKind::Normal
        }
    }

    /// Connector indices below `count`, ascending.
    pub fn connectors(&self, count: usize) -> Vec<usize> {
        (0..count)
            .filter(|&i| self.classify(i) == LinkKind::Connector)
            .collect()
    }
}

/// Immutable master shape descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterShape {
    pub id: ObjectId,
    pub joints: JointPair,
}

/// Source of a rig part instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartTemplate {
    /// Duplicate `id`, placing its local `hinge` on the target point
    Master { id: ObjectId, hinge: Point3 },
    Empty,
}

impl PartTemplate {
    /// Local point placed on the target; the origin for empties.
    pub fn hinge(&self) -> Point3 {
        match self {
            Self::Master { hinge, .. } => *hinge,
            Self::Empty => Point3::origin(),
        }
    }

    pub fn master(&self) -> Option<ObjectId> {
        match self {
            Self::Master { id, .. } => Some(*id),
            Self::Empty => None,
        }
    }
}

/// Resolved secondary-mechanism rig
#[derive(Debug, Clone, PartialEq)]
pub struct RigSetup {
    /// Cam mount in the connector master's local space
    pub cam_local: Point3,
    /// Unit link forward in local space
    pub link_forward_local: Vec3,
    pub pin: PartTemplate,
    pub follower: PartTemplate,
    pub wing: PartTemplate,
    pub pin_outer_half_distance: f64,
    pub follower_outer_half_distance: f64,
    pub force_wing_world_x_zero: bool,
    pub angle_map: Option<AngleMap>,
    pub wing_sign: f64,
}

/// Resolved gear-ratio table entry
#[derive(Debug, Clone, PartialEq)]
pub struct DrivenSetup {
    pub id: ObjectId,
    pub name: String,
    pub coupling: GearCoupling,
    /// World pose at the start frame
    pub rest: RigidPose,
}

/// One sampled rail and its traversal sign
#[derive(Debug, Clone, PartialEq)]
pub struct Rail {
    pub path: SampledPath,
    pub direction_sign: f64,
}

impl Rail {
    /// Arc distance of link `index` after `traveled` units of drive travel.
    pub fn target_distance(&self, index: usize, pitch: f64, traveled: f64) -> f64 {
        self.direction_sign * (index as f64 * pitch + traveled)
    }

    pub fn target(&self, index: usize, pitch: f64, traveled: f64) -> Point3 {
        self.path
            .distance_to_world(self.target_distance(index, pitch, traveled))
    }
}

/// Everything a bake needs, resolved from the scene
#[derive(Debug, Clone, PartialEq)]
pub struct BakeSetup {
    pub gear: ObjectId,
    pub normal: MasterShape,
    pub connector: MasterShape,
    pub classifier: LinkClassifier,
    pub pitch: f64,
    pub link_count: usize,
    pub pitch_radius: f64,
    pub left: Rail,
    pub right: Rail,
    pub rig: Option<RigSetup>,
    pub driven: Vec<DrivenSetup>,
}

impl BakeSetup {
    /// Resolve `config` against the scene at its start frame.
    pub fn resolve<H: SceneHost + ?Sized>(host: &mut H, config: &BakeConfig) -> Result<Self> {
        config.validate()?;
        let names = &config.objects;
        let ctx = host.evaluate_at(config.frames.start);

        let left_curve = host.find_object(&names.left_path, Some(ObjectKind::Curve))?;
        let right_curve = host.find_object(&names.right_path, Some(ObjectKind::Curve))?;
        let normal_id = host.find_object(&names.link_normal, Some(ObjectKind::Mesh))?;
        let connector_id = host.find_object(&names.link_connector, Some(ObjectKind::Mesh))?;
        let gear = host.find_object(&names.gear, None)?;

        let normal = MasterShape {
            id: normal_id,
            joints: resolve_joints(host, normal_id, &config.links)?,
        };
        let connector = MasterShape {
            id: connector_id,
            joints: resolve_joints(host, connector_id, &config.links)?,
        };

        let pitch = normal.joints.pitch();
        let connector_pitch = connector.joints.pitch();
        if (connector_pitch - pitch).abs() > PITCH_MISMATCH_TOLERANCE {
            warn!(
                "Pitch mismatch: {} = {:.6}, {} = {:.6}; using {:.6}",
                names.link_normal, pitch, names.link_connector, connector_pitch, pitch
            );
        }

        let left_path = SampledPath::build(&host.curve_polyline(&ctx, left_curve)?)?;
        let right_path = SampledPath::build(&host.curve_polyline(&ctx, right_curve)?)?;
        let link_count = ((left_path.total_length() / pitch).round() as usize).max(2);

        let left_sign = config.rails.left_sign;
        let right_sign = if config.rails.auto_match_direction {
            left_sign * direction_sign_match(&left_path, &right_path, pitch)
        } else {
            config.rails.right_sign
        };

        let pitch_radius = match config.drive.pitch_radius_source {
            PitchRadiusSource::ToothCount => pitch_radius(pitch, config.drive.tooth_count)?,
            PitchRadiusSource::GearBounds => {
                let radius = radius_from_dimensions(&host.dimensions(gear)?, config.drive.gear_axis());
                if radius <= 0.0 {
                    return Err(chainkit_core::ConfigError::invalid(
                        "drive.pitch_radius_source",
                        format!("gear {} has no extent across its axis", names.gear),
                    )
                    .into());
                }
                radius
            }
        };

        let classifier = LinkClassifier::new(config.links.period, config.links.special_offset);

        let rig = if config.rig.enabled {
            Some(resolve_rig(host, config, &normal, &connector)?)
        } else {
            None
        };

        let driven = resolve_driven(host, &ctx, config)?;

        info!(
            "Track length {:.4}, pitch {:.4}, {} links, pitch radius {:.4}",
            left_path.total_length(),
            pitch,
            link_count,
            pitch_radius
        );
        debug!(
            "Rail signs L={:+} R={:+}, right length {:.4}",
            left_sign,
            right_sign,
            right_path.total_length()
        );

        Ok(Self {
            gear,
            normal,
            connector,
            classifier,
            pitch,
            link_count,
            pitch_radius,
            left: Rail {
                path: left_path,
                direction_sign: left_sign,
            },
            right: Rail {
                path: right_path,
                direction_sign: right_sign,
            },
            rig,
            driven,
        })
    }

    pub fn kind(&self, index: usize) -> LinkKind {
        self.classifier.classify(index)
    }

    pub fn shape(&self, index: usize) -> &MasterShape {
        match self.kind(index) {
            LinkKind::Normal => &self.normal,
            LinkKind::Connector => &self.connector,
        }
    }

    pub fn connector_indices(&self) -> Vec<usize> {
        self.classifier.connectors(self.link_count)
    }
}

/// J0/J1 of a master, with the optional fallback and orientation swap.
fn resolve_joints<H: SceneHost + ?Sized>(
    host: &H,
    id: ObjectId,
    links: &LinkSettings,
) -> Result<JointPair> {
    let j0 = host.find_marker(id, &links.joint_start)?;
    let j1 = host.find_marker(id, &links.joint_end)?;

    let joints = match (j0, j1, links.fallback_pitch) {
        (Some(j0), Some(j1), _) => JointPair::new(j0, j1)?,
        (_, _, Some(pitch)) => {
            warn!(
                "{} has no {}/{} markers, using fallback pitch {}",
                host.object_name(id)?,
                links.joint_start,
                links.joint_end,
                pitch
            );
            JointPair::along_y(pitch)?
        }
        (j0, _, None) => {
            let marker = if j0.is_none() {
                &links.joint_start
            } else {
                &links.joint_end
            };
            return Err(SceneError::MissingMarker {
                object: host.object_name(id)?.to_string(),
                marker: marker.clone(),
            }
            .into());
        }
    };

    Ok(if links.auto_swap {
        joints.oriented(&links.expected_forward())
    } else {
        joints
    })
}

fn resolve_part<H: SceneHost + ?Sized>(
    host: &H,
    source: PartSource,
    name: &str,
    hinge_marker: Option<&str>,
) -> Result<PartTemplate> {
    match source {
        PartSource::Empty => Ok(PartTemplate::Empty),
        PartSource::Master => {
            let id = host.find_object(name, None)?;
            let hinge = match hinge_marker {
                Some(marker) => host.require_marker(id, marker)?,
                None => Point3::origin(),
            };
            Ok(PartTemplate::Master { id, hinge })
        }
    }
}

fn resolve_rig<H: SceneHost + ?Sized>(
    host: &H,
    config: &BakeConfig,
    normal: &MasterShape,
    connector: &MasterShape,
) -> Result<RigSetup> {
    let names = &config.objects;
    let rig = &config.rig;
    let hinge = config.links.hinge_marker.as_str();

    let cam_local = host.require_marker(connector.id, &config.links.cam_marker)?;
    let pin = resolve_part(host, rig.pin_source, &names.pin, Some(hinge))?;
    let follower = resolve_part(host, rig.follower_source, &names.follower, Some(hinge))?;
    let wing = resolve_part(host, rig.wing_source, &names.wing, None)?;

    Ok(RigSetup {
        cam_local,
        link_forward_local: normal.joints.forward(),
        pin,
        follower,
        wing,
        pin_outer_half_distance: rig.pin_outer_half_distance,
        follower_outer_half_distance: rig.follower_outer_half_distance,
        force_wing_world_x_zero: rig.force_wing_world_x_zero,
        angle_map: rig.wing.angle_map()?,
        wing_sign: rig.wing.sign(),
    })
}

fn resolve_driven<H: SceneHost + ?Sized>(
    host: &H,
    ctx: &EvaluationContext,
    config: &BakeConfig,
) -> Result<Vec<DrivenSetup>> {
    config
        .driven_parts
        .iter()
        .map(|part| {
            let id = host.find_object(&part.object, None)?;
            Ok(DrivenSetup {
                id,
                name: part.object.clone(),
                coupling: GearCoupling::new(part.ratio, part.sign, part.axis),
                rest: host.world_pose(ctx, id)?,
            })
        })
        .collect()
}
