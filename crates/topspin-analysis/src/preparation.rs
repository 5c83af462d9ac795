//! Preparation-phase detection.
//!
//! The take-back is scored frame by frame inside an early window of the
//! track: elbow angle near the stroke's target, torso rotated (shoulder
//! line tilted), and the wrist at the expected height relative to the
//! shoulder. The best-scoring frame wins if it clears the stroke's
//! minimum score; otherwise the phase is not found.

use tracing::debug;

use topspin_models::indices;
use topspin_models::{PhaseOutcome, Pose, PoseTrack};

use crate::geometry::{joint_angle_degrees, proximity_score, shoulder_tilt_degrees};
use crate::profile::{PreparationProfile, PREPARATION_ELBOW_WEIGHT};

/// Detect the preparation frame in a canonicalized track.
pub fn detect(track: &PoseTrack, profile: &PreparationProfile) -> PhaseOutcome {
    let total = track.len();
    if total == 0 {
        return PhaseOutcome::NotFound;
    }

    let start = (total as f64 * profile.window.0) as usize;
    let end = ((total as f64 * profile.window.1) as usize).min(total - 1);

    let mut best_score = -1.0;
    let mut best_index = None;

    for index in start..=end {
        let Some(pose) = track.pose(index) else {
            continue;
        };
        let score = composite_score(pose, profile);
        if score > best_score {
            best_score = score;
            best_index = Some(index);
        }
    }

    match best_index {
        Some(index) if best_score >= profile.min_score => {
            debug!(index, score = best_score, "preparation frame selected");
            PhaseOutcome::Detected { frame_index: index }
        }
        _ => {
            debug!(
                best_score,
                threshold = profile.min_score,
                "no preparation frame cleared the threshold"
            );
            PhaseOutcome::NotFound
        }
    }
}

/// Weighted sum of the three preparation sub-scores for one complete pose.
fn composite_score(pose: &Pose, profile: &PreparationProfile) -> f64 {
    let lm = pose.landmarks();
    let shoulder = lm[indices::RIGHT_SHOULDER].point();
    let elbow = lm[indices::RIGHT_ELBOW].point();
    let wrist = lm[indices::RIGHT_WRIST].point();
    let left_shoulder = lm[indices::LEFT_SHOULDER].point();

    let elbow_angle = joint_angle_degrees(shoulder, elbow, wrist);
    let elbow_score = proximity_score(
        elbow_angle,
        profile.elbow_target_degrees,
        profile.elbow_tolerance_degrees,
    );

    let tilt = shoulder_tilt_degrees(left_shoulder, shoulder);
    let shoulder_score = proximity_score(
        tilt,
        profile.shoulder_target_degrees,
        profile.shoulder_tolerance_degrees,
    );

    let wrist_height = wrist.1 - shoulder.1;
    let height_score = proximity_score(
        wrist_height,
        profile.wrist_height_target,
        profile.wrist_height_tolerance,
    );

    PREPARATION_ELBOW_WEIGHT * elbow_score
        + profile.shoulder_weight * shoulder_score
        + profile.wrist_height_weight * height_score
}
