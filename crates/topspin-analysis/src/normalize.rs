//! Body-frame pose normalization.
//!
//! Raw landmarks are image-relative, so two clips of the same stroke filmed
//! at different distances or framings produce incomparable coordinates.
//! Normalization re-expresses every landmark in a body-local frame: the
//! shoulder midpoint becomes the origin and the shoulder-to-shoulder
//! distance becomes the unit of length. After this, alignment distances
//! measure technique rather than camera placement.

use topspin_models::indices::{LEFT_SHOULDER, RIGHT_SHOULDER};
use topspin_models::{Pose, COMPARISON_INDICES};

use crate::error::{AnalysisError, AnalysisResult};
use crate::geometry::point_distance;

/// A pose re-expressed in the body-local frame.
///
/// Holds one `(x, y)` point per input landmark, in landmark-index order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPose {
    points: Vec<(f64, f64)>,
}

impl NormalizedPose {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the pose holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Normalized point at a fixed landmark index, if present.
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        self.points.get(index).copied()
    }

    /// The comparison subset (shoulders, elbows, wrists, hips, knees,
    /// ankles) as a flat point sequence, in index order.
    pub fn comparison_vector(&self) -> Vec<(f64, f64)> {
        COMPARISON_INDICES
            .iter()
            .filter_map(|&index| self.point(index))
            .collect()
    }
}

/// Normalize a pose into the body-local frame.
///
/// The shoulder midpoint maps to the origin and coordinates are divided by
/// the shoulder distance. Coincident shoulders would make that distance
/// zero, so the scale floors to 1.0 and only the translation applies.
///
/// Fails with [`AnalysisError::MissingLandmarks`] when the pose is too
/// short to carry both shoulder landmarks.
pub fn normalize_pose(pose: &Pose) -> AnalysisResult<NormalizedPose> {
    let left = pose
        .point(LEFT_SHOULDER)
        .ok_or(AnalysisError::MissingLandmarks(pose.len()))?;
    let right = pose
        .point(RIGHT_SHOULDER)
        .ok_or(AnalysisError::MissingLandmarks(pose.len()))?;

    let center = ((left.0 + right.0) / 2.0, (left.1 + right.1) / 2.0);
    let shoulder_dist = point_distance(left, right);
    let scale = if shoulder_dist > 0.0 { shoulder_dist } else { 1.0 };

    let points = pose
        .landmarks()
        .iter()
        .map(|lm| ((lm.x - center.0) / scale, (lm.y - center.1) / scale))
        .collect();

    Ok(NormalizedPose { points })
}
