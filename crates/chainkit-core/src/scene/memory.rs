//! In-memory scene host
//!
//! A [`SceneHost`] backed by a serde document. The command line tool loads a
//! scene exported from the content application as JSON, bakes into it, and
//! writes it back; tests build scenes directly.

use super::{ContainerId, EvaluationContext, ObjectId, ObjectKind, SceneHost};
use crate::error::{Result, SceneError};
use crate::math::{Axis, Point3, Quat, RigidPose, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

fn zero_vec() -> Vec3 {
    Vec3::zeros()
}

fn identity_rotation() -> Quat {
    Quat::identity()
}

fn default_cyclic() -> bool {
    true
}

/// Control points of a curve's first spline, in object space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    pub points: Vec<Point3>,
    #[serde(default = "default_cyclic")]
    pub cyclic: bool,
}

/// Authored XYZ euler rotation (radians) at a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationKey {
    pub frame: i32,
    pub euler: [f64; 3],
}

/// Baked pose at a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i32,
    pub pose: RigidPose,
}

/// One object of the scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    /// Parent object name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Translation relative to the parent (world for root objects)
    #[serde(default = "zero_vec")]
    pub translation: Vec3,
    /// Rest rotation relative to the parent
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    #[serde(default = "zero_vec")]
    pub dimensions: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveData>,
    /// Rotation animation; overrides `rotation` when present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rotation_keys: Vec<RotationKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<Keyframe>,
    /// Object whose geometry this instance shares
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            dimensions: Vec3::zeros(),
            curve: None,
            rotation_keys: Vec::new(),
            keyframes: Vec::new(),
            source: None,
            container: None,
        }
    }

    /// Cyclic curve object through `points`
    pub fn curve(name: impl Into<String>, points: Vec<Point3>) -> Self {
        let mut obj = Self::new(name, ObjectKind::Curve);
        obj.curve = Some(CurveData {
            points,
            cyclic: true,
        });
        obj
    }

    /// Empty parented to `parent` at a local position
    pub fn marker(name: impl Into<String>, parent: impl Into<String>, at: Vec3) -> Self {
        Self::new(name, ObjectKind::Empty)
            .with_parent(parent)
            .with_translation(at)
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_dimensions(mut self, dimensions: Vec3) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_rotation_keys(mut self, mut keys: Vec<RotationKey>) -> Self {
        keys.sort_by_key(|k| k.frame);
        self.rotation_keys = keys;
        self
    }

    fn euler_at(&self, frame: i32) -> [f64; 3] {
        let keys = &self.rotation_keys;
        let (first, last) = match (keys.first(), keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                let (x, y, z) = self.rotation.euler_angles();
                return [x, y, z];
            }
        };
        if frame <= first.frame {
            return first.euler;
        }
        if frame >= last.frame {
            return last.euler;
        }
        let hi = keys.partition_point(|k| k.frame <= frame);
        let (a, b) = (&keys[hi - 1], &keys[hi]);
        let t = f64::from(frame - a.frame) / f64::from(b.frame - a.frame);
        [
            a.euler[0] + (b.euler[0] - a.euler[0]) * t,
            a.euler[1] + (b.euler[1] - a.euler[1]) * t,
            a.euler[2] + (b.euler[2] - a.euler[2]) * t,
        ]
    }

    fn local_pose_at(&self, frame: i32) -> RigidPose {
        let rotation = if self.rotation_keys.is_empty() {
            self.rotation
        } else {
            let [x, y, z] = self.euler_at(frame);
            Quat::from_euler_angles(x, y, z)
        };
        RigidPose::new(self.translation, rotation)
    }
}

/// Serializable form of a [`MemoryScene`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub containers: Vec<String>,
}

/// In-memory [`SceneHost`]
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    objects: BTreeMap<usize, SceneObject>,
    names: HashMap<String, usize>,
    containers: Vec<String>,
    next_id: usize,
    frame: i32,
    generation: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: SceneDocument) -> Result<Self> {
        let mut scene = Self::new();
        for name in document.containers {
            scene.ensure_container(&name)?;
        }
        for obj in document.objects {
            scene.insert(obj)?;
        }
        Ok(scene)
    }

    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            objects: self.objects.values().cloned().collect(),
            containers: self.containers.clone(),
        }
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document: SceneDocument = serde_json::from_str(&content)?;
        Self::from_document(document)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.to_document())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Add an object. Names must be unique.
    pub fn insert(&mut self, mut obj: SceneObject) -> Result<ObjectId> {
        if self.names.contains_key(&obj.name) {
            return Err(SceneError::DuplicateName(obj.name).into());
        }
        if let Some(container) = &obj.container {
            if !self.containers.contains(container) {
                self.containers.push(container.clone());
            }
        }
        obj.rotation_keys.sort_by_key(|k| k.frame);
        obj.keyframes.sort_by_key(|k| k.frame);

        let id = self.next_id;
        self.next_id += 1;
        self.names.insert(obj.name.clone(), id);
        self.objects.insert(id, obj);
        Ok(ObjectId(id))
    }

    pub fn object(&self, id: ObjectId) -> Result<&SceneObject> {
        self.objects
            .get(&id.0)
            .ok_or_else(|| SceneError::UnknownHandle(id).into())
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject> {
        self.objects
            .get_mut(&id.0)
            .ok_or_else(|| SceneError::UnknownHandle(id).into())
    }

    pub fn keyframes(&self, id: ObjectId) -> Result<&[Keyframe]> {
        Ok(&self.object(id)?.keyframes)
    }

    /// Objects currently linked into the named container, in creation order
    pub fn container_objects(&self, container: &str) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, obj)| obj.container.as_deref() == Some(container))
            .map(|(id, _)| ObjectId(*id))
            .collect()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn current_frame(&self) -> i32 {
        self.frame
    }

    fn check_context(&self, ctx: &EvaluationContext) -> Result<()> {
        if ctx.generation() != self.generation || ctx.frame() != self.frame {
            return Err(SceneError::StaleContext {
                requested: ctx.frame(),
                current: self.frame,
            }
            .into());
        }
        Ok(())
    }

    fn container_name(&self, container: ContainerId) -> Result<&str> {
        self.containers
            .get(container.0)
            .map(String::as_str)
            .ok_or_else(|| SceneError::UnknownContainer(container).into())
    }

    fn world_pose_at(&self, id: ObjectId, frame: i32) -> Result<RigidPose> {
        let obj = self.object(id)?;
        let local = obj.local_pose_at(frame);
        match &obj.parent {
            Some(parent) => {
                let parent_id = self.find_object(parent, None)?;
                Ok(self.world_pose_at(parent_id, frame)?.compose(&local))
            }
            None => Ok(local),
        }
    }

    fn remove(&mut self, id: usize) {
        if let Some(obj) = self.objects.remove(&id) {
            self.names.remove(&obj.name);
        }
    }
}

impl SceneHost for MemoryScene {
    fn find_object(&self, name: &str, expected: Option<ObjectKind>) -> Result<ObjectId> {
        let id = self
            .names
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::MissingObject {
                name: name.to_string(),
            })?;
        let obj = self.object(ObjectId(id))?;
        if let Some(expected) = expected {
            if obj.kind != expected {
                return Err(SceneError::WrongKind {
                    name: name.to_string(),
                    expected,
                    actual: obj.kind,
                }
                .into());
            }
        }
        Ok(ObjectId(id))
    }

    fn object_name(&self, id: ObjectId) -> Result<&str> {
        Ok(self.object(id)?.name.as_str())
    }

    fn object_kind(&self, id: ObjectId) -> Result<ObjectKind> {
        Ok(self.object(id)?.kind)
    }

    fn children(&self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let name = self.object_name(id)?;
        Ok(self
            .objects
            .iter()
            .filter(|(_, obj)| obj.parent.as_deref() == Some(name))
            .map(|(child, _)| ObjectId(*child))
            .collect())
    }

    fn container_of(&self, id: ObjectId) -> Result<Option<&str>> {
        Ok(self.object(id)?.container.as_deref())
    }

    fn local_translation(&self, id: ObjectId) -> Result<Vec3> {
        Ok(self.object(id)?.translation)
    }

    fn dimensions(&self, id: ObjectId) -> Result<Vec3> {
        Ok(self.object(id)?.dimensions)
    }

    fn evaluate_at(&mut self, frame: i32) -> EvaluationContext {
        self.frame = frame;
        self.generation += 1;
        EvaluationContext::new(frame, self.generation)
    }

    fn world_pose(&self, ctx: &EvaluationContext, id: ObjectId) -> Result<RigidPose> {
        self.check_context(ctx)?;
        self.world_pose_at(id, ctx.frame())
    }

    fn axis_angle(&self, ctx: &EvaluationContext, id: ObjectId, axis: Axis) -> Result<f64> {
        self.check_context(ctx)?;
        Ok(self.object(id)?.euler_at(ctx.frame())[axis.index()])
    }

    fn curve_polyline(&self, ctx: &EvaluationContext, id: ObjectId) -> Result<Vec<Point3>> {
        self.check_context(ctx)?;
        let obj = self.object(id)?;
        if obj.kind != ObjectKind::Curve {
            return Err(SceneError::WrongKind {
                name: obj.name.clone(),
                expected: ObjectKind::Curve,
                actual: obj.kind,
            }
            .into());
        }
        let curve = match &obj.curve {
            Some(curve) if !curve.points.is_empty() => curve,
            _ => {
                return Err(SceneError::MissingSpline {
                    object: obj.name.clone(),
                }
                .into())
            }
        };
        if curve.points.len() < 2 {
            return Err(SceneError::NotEnoughCurvePoints {
                object: obj.name.clone(),
                count: curve.points.len(),
            }
            .into());
        }
        let world = self.world_pose_at(id, ctx.frame())?;
        Ok(curve.points.iter().map(|p| world.transform_point(p)).collect())
    }

    fn ensure_container(&mut self, name: &str) -> Result<ContainerId> {
        if let Some(index) = self.containers.iter().position(|c| c == name) {
            return Ok(ContainerId(index));
        }
        self.containers.push(name.to_string());
        Ok(ContainerId(self.containers.len() - 1))
    }

    fn clear_container(&mut self, container: ContainerId) -> Result<usize> {
        let name = self.container_name(container)?.to_string();
        let doomed: Vec<usize> = self
            .objects
            .iter()
            .filter(|(_, obj)| obj.container.as_deref() == Some(name.as_str()))
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            self.remove(*id);
        }
        debug!("Cleared {} object(s) from {}", doomed.len(), name);
        Ok(doomed.len())
    }

    fn duplicate_into(
        &mut self,
        source: ObjectId,
        name: &str,
        container: ContainerId,
    ) -> Result<ObjectId> {
        let container = self.container_name(container)?.to_string();
        let src = self.object(source)?;
        let mut copy = src.clone();
        copy.name = name.to_string();
        copy.parent = None;
        copy.rotation_keys.clear();
        copy.keyframes.clear();
        copy.source = Some(src.source.clone().unwrap_or_else(|| src.name.clone()));
        copy.container = Some(container);
        self.insert(copy)
    }

    fn new_empty(&mut self, name: &str, container: ContainerId) -> Result<ObjectId> {
        let container = self.container_name(container)?.to_string();
        let mut obj = SceneObject::new(name, ObjectKind::Empty);
        obj.container = Some(container);
        self.insert(obj)
    }

    fn insert_keyframe(&mut self, id: ObjectId, frame: i32, pose: &RigidPose) -> Result<()> {
        let obj = self.object_mut(id)?;
        let key = Keyframe { frame, pose: *pose };
        match obj.keyframes.binary_search_by_key(&frame, |k| k.frame) {
            Ok(index) => obj.keyframes[index] = key,
            Err(index) => obj.keyframes.insert(index, key),
        }
        Ok(())
    }

    fn replace_curve(&mut self, name: &str, points: &[Point3], cyclic: bool) -> Result<ObjectId> {
        if let Some(existing) = self.names.get(name).copied() {
            self.remove(existing);
        }
        let mut obj = SceneObject::curve(name, points.to_vec());
        if let Some(curve) = obj.curve.as_mut() {
            curve.cyclic = cyclic;
        }
        self.insert(obj)
    }
}
