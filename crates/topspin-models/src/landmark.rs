//! Pose landmark definitions.
//!
//! A pose is the fixed-size set of anatomical landmarks the pose service
//! reports for one frame (33-point topology, indices below). Coordinates are
//! image-relative in [0, 1] with y growing downward; `z` is relative depth
//! and `visibility` the detector's confidence for that joint.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete pose.
///
/// A detection reporting any other count is treated as "no pose" so that
/// fixed-index access stays safe.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Landmark indices used across the analysis pipeline.
pub mod indices {
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;
}

/// The fixed landmark subset used for stroke comparison: shoulders, elbows,
/// wrists, hips, knees and ankles, in index order.
pub const COMPARISON_INDICES: [usize; 12] = [
    indices::LEFT_SHOULDER,
    indices::RIGHT_SHOULDER,
    indices::LEFT_ELBOW,
    indices::RIGHT_ELBOW,
    indices::LEFT_WRIST,
    indices::RIGHT_WRIST,
    indices::LEFT_HIP,
    indices::RIGHT_HIP,
    indices::LEFT_KNEE,
    indices::RIGHT_KNEE,
    indices::LEFT_ANKLE,
    indices::RIGHT_ANKLE,
];

/// Left/right landmark pairs of the 33-point topology, used when mirroring
/// a pose for handedness canonicalization. Index 0 (nose) has no pair.
const MIRROR_PAIRS: [(usize, usize); 16] = [
    (1, 4),
    (2, 5),
    (3, 6),
    (7, 8),
    (9, 10),
    (11, 12),
    (13, 14),
    (15, 16),
    (17, 18),
    (19, 20),
    (21, 22),
    (23, 24),
    (25, 26),
    (27, 28),
    (29, 30),
    (31, 32),
];

/// One anatomical joint's position and confidence for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    /// Horizontal position, image-relative (0.0 = left edge).
    pub x: f64,
    /// Vertical position, image-relative (0.0 = top edge).
    pub y: f64,
    /// Relative depth (negative = closer to the camera).
    pub z: f64,
    /// Detector confidence that this joint is visible (0.0-1.0).
    pub visibility: f64,
}

impl Landmark {
    /// Create a new landmark.
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    /// Create a landmark at an (x, y) position with full visibility.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }

    /// The 2D position as a point tuple.
    pub fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// The ordered landmark set detected for a single frame.
///
/// Serializes as a bare JSON array of landmark objects, which is also the
/// on-disk format of reference corpus phase records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Pose(pub Vec<Landmark>);

impl Pose {
    /// Create a pose from a landmark list.
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self(landmarks)
    }

    /// Number of landmarks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no landmarks are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the pose carries the full 33-landmark set.
    pub fn is_complete(&self) -> bool {
        self.0.len() == POSE_LANDMARK_COUNT
    }

    /// Landmark at a fixed index, if present.
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.0.get(index)
    }

    /// 2D position of the landmark at `index`, if present.
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        self.0.get(index).map(Landmark::point)
    }

    /// Iterate over the landmarks.
    pub fn landmarks(&self) -> &[Landmark] {
        &self.0
    }

    /// Mirror the pose horizontally: x maps to `1 - x` and each left/right
    /// landmark pair is swapped, so a left-handed player's pose reads as
    /// right-handed. Incomplete poses are mirrored coordinate-wise only.
    pub fn mirrored(&self) -> Self {
        let mut landmarks: Vec<Landmark> = self
            .0
            .iter()
            .map(|lm| Landmark::new(1.0 - lm.x, lm.y, lm.z, lm.visibility))
            .collect();

        if self.is_complete() {
            for &(left, right) in &MIRROR_PAIRS {
                landmarks.swap(left, right);
            }
        }

        Self(landmarks)
    }
}
