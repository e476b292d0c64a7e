//! Gear-ratio driven parts.

use crate::drive::DriveTimeline;
use crate::setup::DrivenSetup;
use chainkit_core::{ObjectId, RigidPose};

/// Per-frame poses for one driven part, keyed onto the part itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivenTrack {
    pub id: ObjectId,
    pub name: String,
    pub poses: Vec<RigidPose>,
}

pub fn bake_driven(parts: &[DrivenSetup], timeline: &DriveTimeline) -> Vec<DrivenTrack> {
    parts
        .iter()
        .map(|part| DrivenTrack {
            id: part.id,
            name: part.name.clone(),
            poses: timeline
                .iter()
                .map(|(_, theta)| part.coupling.pose(&part.rest, theta))
                .collect(),
        })
        .collect()
}
