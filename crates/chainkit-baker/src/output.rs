//! Writing baked tracks back into the host scene.
//!
//! All host mutation of a bake happens here, after every pose has been
//! computed.

use crate::chain::RailBake;
use crate::driven::DrivenTrack;
use crate::rig::{RigFrame, RigTrack};
use crate::setup::{BakeSetup, PartTemplate};
use chainkit_core::{ContainerId, Error, ObjectId, Result, RigidPose, SceneError, SceneHost};
use chainkit_settings::{FrameRange, ObjectNames};
use std::fmt;
use tracing::debug;

/// Rail side, used in instance names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "L"),
            Self::Right => write!(f, "R"),
        }
    }
}

pub fn link_name(side: Side, index: usize) -> String {
    format!("{}_ChainLink_{:04}", side, index)
}

pub fn pin_name(side: Side, index: usize) -> String {
    format!("Pin_{}_{:04}", side, index)
}

pub fn follower_name(side: Side, index: usize) -> String {
    format!("Follower_{}_{:04}", side, index)
}

pub fn pivot_name(index: usize) -> String {
    format!("WingPivot_{:04}", index)
}

pub fn wing_name(index: usize) -> String {
    format!("Wing_{:04}", index)
}

/// Every object name a bake will create, in write order.
pub fn output_names(setup: &BakeSetup, rigs: &[RigTrack]) -> Vec<String> {
    let mut names = Vec::with_capacity(2 * setup.link_count + 6 * rigs.len());
    for side in [Side::Left, Side::Right] {
        names.extend((0..setup.link_count).map(|i| link_name(side, i)));
    }
    if setup.rig.is_some() {
        for i in rigs.iter().map(|t| t.link_index) {
            names.extend([
                pin_name(Side::Left, i),
                pin_name(Side::Right, i),
                follower_name(Side::Left, i),
                follower_name(Side::Right, i),
                pivot_name(i),
                wing_name(i),
            ]);
        }
    }
    names
}

/// The three output containers of a bake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Containers {
    pub left: ContainerId,
    pub right: ContainerId,
    pub rig: ContainerId,
}

/// Host writer that counts what it creates.
pub struct OutputWriter<'a, H: SceneHost + ?Sized> {
    host: &'a mut H,
    frames: FrameRange,
    pub objects_created: usize,
    pub objects_cleared: usize,
    pub keyframes_written: usize,
}

impl<'a, H: SceneHost + ?Sized> OutputWriter<'a, H> {
    pub fn new(host: &'a mut H, frames: FrameRange) -> Self {
        Self {
            host,
            frames,
            objects_created: 0,
            objects_cleared: 0,
            keyframes_written: 0,
        }
    }

    /// Fail if a name in `planned` belongs to an object that clearing the
    /// output containers would not remove. Writes nothing.
    pub fn check_names(&self, names: &ObjectNames, planned: &[String]) -> Result<()> {
        let ours = [
            names.left_container.as_str(),
            names.right_container.as_str(),
            names.rig_container.as_str(),
        ];
        for name in planned {
            let id = match self.host.find_object(name, None) {
                Ok(id) => id,
                Err(Error::Scene(SceneError::MissingObject { .. })) => continue,
                Err(e) => return Err(e),
            };
            match self.host.container_of(id)? {
                Some(container) if ours.contains(&container) => {}
                _ => return Err(SceneError::DuplicateName(name.clone()).into()),
            }
        }
        Ok(())
    }

    /// Ensure the output containers exist and empty them.
    pub fn prepare(&mut self, names: &ObjectNames) -> Result<Containers> {
        let containers = Containers {
            left: self.host.ensure_container(&names.left_container)?,
            right: self.host.ensure_container(&names.right_container)?,
            rig: self.host.ensure_container(&names.rig_container)?,
        };
        for id in [containers.left, containers.right, containers.rig] {
            self.objects_cleared += self.host.clear_container(id)?;
        }
        debug!("Cleared {} previous output objects", self.objects_cleared);
        Ok(containers)
    }

    fn instantiate(
        &mut self,
        template: &PartTemplate,
        name: &str,
        container: ContainerId,
    ) -> Result<ObjectId> {
        let id = match template.master() {
            Some(master) => self.host.duplicate_into(master, name, container)?,
            None => self.host.new_empty(name, container)?,
        };
        self.objects_created += 1;
        Ok(id)
    }

    /// Key `poses` onto `id`, one per frame from the range start.
    pub fn key_track<'p>(
        &mut self,
        id: ObjectId,
        poses: impl IntoIterator<Item = &'p RigidPose>,
    ) -> Result<()> {
        for (frame, pose) in self.frames.frames().zip(poses) {
            self.host.insert_keyframe(id, frame, pose)?;
            self.keyframes_written += 1;
        }
        Ok(())
    }

    /// One duplicated master per link, keyed across all frames.
    pub fn write_rail(
        &mut self,
        side: Side,
        setup: &BakeSetup,
        bake: &RailBake,
        container: ContainerId,
    ) -> Result<()> {
        for index in 0..setup.link_count {
            let master = setup.shape(index).id;
            let name = link_name(side, index);
            let id = self.host.duplicate_into(master, &name, container)?;
            self.objects_created += 1;
            self.key_track(id, bake.link_track(index))?;
        }
        Ok(())
    }

    pub fn write_rigs(
        &mut self,
        setup: &BakeSetup,
        tracks: &[RigTrack],
        container: ContainerId,
    ) -> Result<()> {
        let Some(rig) = &setup.rig else {
            return Ok(());
        };

        type Pick = fn(&RigFrame) -> &RigidPose;
        for track in tracks {
            let i = track.link_index;
            let parts: [(&PartTemplate, String, Pick); 6] = [
                (&rig.pin, pin_name(Side::Left, i), |f| &f.pin_left),
                (&rig.pin, pin_name(Side::Right, i), |f| &f.pin_right),
                (&rig.follower, follower_name(Side::Left, i), |f| &f.follower_left),
                (&rig.follower, follower_name(Side::Right, i), |f| &f.follower_right),
                (&PartTemplate::Empty, pivot_name(i), |f| &f.pivot),
                (&rig.wing, wing_name(i), |f| &f.wing),
            ];
            for (template, name, pick) in parts {
                let id = self.instantiate(template, &name, container)?;
                self.key_track(id, track.frames.iter().map(pick))?;
            }
        }
        Ok(())
    }

    /// Driven parts are keyed in place, not duplicated.
    pub fn write_driven(&mut self, tracks: &[DrivenTrack]) -> Result<()> {
        for track in tracks {
            self.key_track(track.id, &track.poses)?;
        }
        Ok(())
    }
}
