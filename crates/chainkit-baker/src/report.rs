//! Bake and track-path summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a completed bake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakeReport {
    pub baked_at: DateTime<Utc>,
    pub frame_start: i32,
    pub frame_end: i32,
    pub frame_count: usize,
    pub link_count: usize,
    pub pitch: f64,
    pub pitch_radius: f64,
    pub left_length: f64,
    pub right_length: f64,
    pub left_sign: f64,
    pub right_sign: f64,
    pub connector_indices: Vec<usize>,
    pub rig_count: usize,
    pub driven_parts: Vec<String>,
    pub objects_created: usize,
    pub objects_cleared: usize,
    pub keyframes_written: usize,
}

impl BakeReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Baked {} links x 2 rails and {} rigs over frames {}..={} ({} keyframes)",
            self.link_count, self.rig_count, self.frame_start, self.frame_end, self.keyframes_written
        )
    }
}

/// Summary of a generated track path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPathReport {
    pub name: String,
    pub point_count: usize,
    pub radius: f64,
    pub center_distance: f64,
}

impl TrackPathReport {
    /// Loop length: two half circles plus two straights.
    pub fn length(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.radius + 2.0 * self.center_distance
    }
}
