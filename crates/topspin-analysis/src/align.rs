//! Elastic alignment of normalized poses.
//!
//! Two poses of the same phase are compared by dynamic time warping over
//! their comparison keypoint sequences. Warping tolerates small positional
//! shifts between corresponding joints while still accumulating genuine
//! technique differences into the distance. The exact quadratic recurrence
//! is used; comparison sequences are twelve points long, so there is
//! nothing to gain from an approximation.

use topspin_models::indices::{
    LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_WRIST,
};
use topspin_models::{
    JointDeviation, JointSide, PhaseComparison, PhaseKind, DEVIATION_THRESHOLD_DEGREES,
};

use crate::geometry::{joint_angle_degrees, point_distance};
use crate::normalize::NormalizedPose;

/// Dynamic time warping distance between two point sequences, with
/// Euclidean point cost.
///
/// Returns infinity when either sequence is empty.
pub fn dtw_distance(seq_a: &[(f64, f64)], seq_b: &[(f64, f64)]) -> f64 {
    if seq_a.is_empty() || seq_b.is_empty() {
        return f64::INFINITY;
    }

    // Two rolling rows over the padded cost matrix.
    let mut prev = vec![f64::INFINITY; seq_b.len() + 1];
    let mut curr = vec![f64::INFINITY; seq_b.len() + 1];
    prev[0] = 0.0;

    for &a in seq_a {
        curr[0] = f64::INFINITY;
        for (j, &b) in seq_b.iter().enumerate() {
            let cost = point_distance(a, b);
            curr[j + 1] = cost + prev[j].min(prev[j + 1]).min(curr[j]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[seq_b.len()]
}

/// Compare one phase's user pose against the reference pose.
///
/// The alignment distance runs over the comparison keypoint subset; elbow
/// deviations are measured separately on both arms and flagged when they
/// exceed the deviation threshold.
pub fn compare_phase(
    phase: PhaseKind,
    user: &NormalizedPose,
    reference: &NormalizedPose,
) -> PhaseComparison {
    let distance = dtw_distance(&user.comparison_vector(), &reference.comparison_vector());
    let deviations = elbow_deviations(user, reference);
    PhaseComparison::new(phase, distance, deviations)
}

/// Interior elbow angle of one arm, from normalized points.
fn elbow_angle(pose: &NormalizedPose, shoulder: usize, elbow: usize, wrist: usize) -> Option<f64> {
    let shoulder = pose.point(shoulder)?;
    let elbow = pose.point(elbow)?;
    let wrist = pose.point(wrist)?;
    Some(joint_angle_degrees(shoulder, elbow, wrist))
}

fn elbow_deviations(user: &NormalizedPose, reference: &NormalizedPose) -> Vec<JointDeviation> {
    const ARMS: [(JointSide, usize, usize, usize); 2] = [
        (JointSide::Left, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
        (JointSide::Right, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
    ];

    let mut deviations = Vec::new();
    for (side, shoulder, elbow, wrist) in ARMS {
        let user_angle = elbow_angle(user, shoulder, elbow, wrist);
        let reference_angle = elbow_angle(reference, shoulder, elbow, wrist);
        if let (Some(user_angle), Some(reference_angle)) = (user_angle, reference_angle) {
            let delta = (user_angle - reference_angle).abs();
            if delta > DEVIATION_THRESHOLD_DEGREES {
                deviations.push(JointDeviation::new(side, delta));
            }
        }
    }
    deviations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_pose;
    use topspin_models::{indices, DistanceTier, Landmark, Pose, POSE_LANDMARK_COUNT};

    /// Pose with a fixed torso and a right elbow bent to the given interior
    /// angle (180 = straight arm hanging down). The left arm stays straight
    /// in every pose so only the right elbow varies between test poses.
    fn pose_with_right_elbow(angle_degrees: f64) -> Pose {
        let mut landmarks = vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT];
        landmarks[indices::LEFT_SHOULDER] = Landmark::at(0.4, 0.3);
        landmarks[indices::RIGHT_SHOULDER] = Landmark::at(0.6, 0.3);
        landmarks[indices::LEFT_ELBOW] = Landmark::at(0.4, 0.45);
        landmarks[indices::LEFT_WRIST] = Landmark::at(0.4, 0.6);
        landmarks[indices::RIGHT_ELBOW] = Landmark::at(0.6, 0.45);

        let theta = angle_degrees.to_radians();
        landmarks[indices::RIGHT_WRIST] =
            Landmark::at(0.6 + 0.15 * theta.sin(), 0.45 - 0.15 * theta.cos());
        Pose::new(landmarks)
    }

    #[test]
    fn test_dtw_identical_sequences_are_zero() {
        let seq = vec![(0.0, 0.0), (1.0, 0.5), (2.0, 1.0)];
        assert!(dtw_distance(&seq, &seq).abs() < 1e-9);
    }

    #[test]
    fn test_dtw_single_points_reduce_to_euclidean() {
        let d = dtw_distance(&[(0.0, 0.0)], &[(3.0, 4.0)]);
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_dtw_known_small_case() {
        // Best path: a0->b0 (0), a1->b1 (1). Total 1.
        let a = [(0.0, 0.0), (1.0, 0.0)];
        let b = [(0.0, 0.0), (2.0, 0.0)];
        assert!((dtw_distance(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dtw_warps_unequal_lengths() {
        // The middle point maps onto the nearer endpoint at cost 1;
        // endpoint pairs align at zero cost.
        let a = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        let b = [(0.0, 0.0), (2.0, 0.0)];
        assert!((dtw_distance(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dtw_is_symmetric() {
        let a = [(0.0, 0.0), (1.0, 1.0), (2.5, 0.5)];
        let b = [(0.5, 0.0), (1.5, 1.0)];
        let ab = dtw_distance(&a, &b);
        let ba = dtw_distance(&b, &a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_dtw_empty_sequence_is_infinite() {
        assert!(dtw_distance(&[], &[(0.0, 0.0)]).is_infinite());
        assert!(dtw_distance(&[(0.0, 0.0)], &[]).is_infinite());
        assert!(dtw_distance(&[], &[]).is_infinite());
    }

    #[test]
    fn test_identical_poses_align_exactly() {
        let normalized = normalize_pose(&pose_with_right_elbow(180.0)).expect("normalize");
        let cmp = compare_phase(PhaseKind::Preparation, &normalized, &normalized);

        assert!(cmp.distance.abs() < 1e-9);
        assert_eq!(cmp.tier, DistanceTier::Excellent);
        assert!(cmp.deviations.is_empty());
    }

    #[test]
    fn test_large_right_elbow_delta_is_flagged() {
        let user = normalize_pose(&pose_with_right_elbow(160.0)).expect("normalize");
        let reference = normalize_pose(&pose_with_right_elbow(180.0)).expect("normalize");
        let cmp = compare_phase(PhaseKind::Impact, &user, &reference);

        assert_eq!(cmp.deviations.len(), 1);
        let deviation = &cmp.deviations[0];
        assert_eq!(deviation.side, JointSide::Right);
        assert!((deviation.delta_degrees - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_small_elbow_delta_is_not_flagged() {
        let user = normalize_pose(&pose_with_right_elbow(170.0)).expect("normalize");
        let reference = normalize_pose(&pose_with_right_elbow(180.0)).expect("normalize");
        let cmp = compare_phase(PhaseKind::Impact, &user, &reference);

        assert!(cmp.deviations.is_empty());
    }
}
