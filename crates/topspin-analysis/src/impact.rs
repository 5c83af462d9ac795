//! Impact-phase detection.
//!
//! Contact shows up as a deceleration spike: the dominant arm's elbow and
//! forearm angles are smoothed, differentiated into angular velocities,
//! and the blended absolute velocity change is searched for its peak in
//! the middle half of the swing. The winning index is mapped back through
//! skipped invalid frames, then the nearest frame with a full pose is
//! taken. Tracks too sparse for velocity analysis (or with no usable
//! frame near the peak) degrade to the frame of maximum wrist-to-shoulder
//! extension.

use tracing::debug;

use topspin_models::indices;
use topspin_models::{FallbackMethod, PhaseOutcome, PoseTrack};

use crate::geometry::{
    joint_angle_degrees, normalize_angle_delta, point_distance, segment_orientation_degrees,
};
use crate::profile::ImpactProfile;
use crate::smoothing::moving_average;

/// Minimum velocity samples for peak search.
const MIN_VELOCITY_SAMPLES: usize = 5;

/// Per-frame arm measurements; `None` where the frame has no usable pose.
struct ArmSignals {
    elbow_degrees: Vec<Option<f64>>,
    forearm_degrees: Vec<Option<f64>>,
    extension: Vec<Option<f64>>,
}

/// Detect the impact frame in a canonicalized track.
pub fn detect(track: &PoseTrack, profile: &ImpactProfile) -> PhaseOutcome {
    if track.is_empty() {
        return PhaseOutcome::NotFound;
    }

    let signals = collect_signals(track);
    let valid_elbow: Vec<f64> = signals.elbow_degrees.iter().flatten().copied().collect();

    if valid_elbow.len() < profile.min_valid_frames {
        debug!(
            valid = valid_elbow.len(),
            "too few valid frames for angular analysis"
        );
        return extension_fallback(&signals);
    }

    let valid_forearm: Vec<f64> = signals.forearm_degrees.iter().flatten().copied().collect();

    let smooth_elbow = moving_average(&valid_elbow, profile.smoothing_window);
    let smooth_forearm = moving_average(&valid_forearm, profile.smoothing_window);

    let elbow_velocities = angular_velocities(&smooth_elbow, track.fps);
    let forearm_velocities = angular_velocities(&smooth_forearm, track.fps);

    let peak = deceleration_peak(&elbow_velocities, &forearm_velocities, profile);

    // The peak indexes the valid-frame sequence; map it back onto the track.
    let valid_indices = track.valid_indices();
    let mapped = valid_indices
        .get(peak)
        .copied()
        .unwrap_or(track.len() / 2);

    for offset in -profile.scan_radius..=profile.scan_radius {
        let candidate = mapped as i64 + offset;
        if candidate < 0 || candidate >= track.len() as i64 {
            continue;
        }
        let candidate = candidate as usize;
        if track.pose(candidate).is_some() {
            debug!(index = candidate, "impact frame selected by angular analysis");
            return PhaseOutcome::Detected {
                frame_index: candidate,
            };
        }
    }

    debug!(mapped, "no full pose near the deceleration peak");
    extension_fallback(&signals)
}

fn collect_signals(track: &PoseTrack) -> ArmSignals {
    let mut signals = ArmSignals {
        elbow_degrees: Vec::with_capacity(track.len()),
        forearm_degrees: Vec::with_capacity(track.len()),
        extension: Vec::with_capacity(track.len()),
    };

    for index in 0..track.len() {
        let Some(pose) = track.pose(index) else {
            signals.elbow_degrees.push(None);
            signals.forearm_degrees.push(None);
            signals.extension.push(None);
            continue;
        };
        let lm = pose.landmarks();
        let shoulder = lm[indices::RIGHT_SHOULDER].point();
        let elbow = lm[indices::RIGHT_ELBOW].point();
        let wrist = lm[indices::RIGHT_WRIST].point();

        signals
            .elbow_degrees
            .push(Some(joint_angle_degrees(shoulder, elbow, wrist)));
        signals
            .forearm_degrees
            .push(Some(segment_orientation_degrees(elbow, wrist)));
        signals.extension.push(Some(point_distance(shoulder, wrist)));
    }

    signals
}

/// Frame-to-frame angular velocity in degrees per second, with the raw
/// difference folded into [-180, 180].
fn angular_velocities(angles: &[f64], fps: f64) -> Vec<f64> {
    angles
        .windows(2)
        .map(|pair| normalize_angle_delta(pair[1] - pair[0]) * fps)
        .collect()
}

/// Index of maximum blended |velocity change| within the profile's search
/// region. Degenerate inputs resolve to the sequence midpoint.
fn deceleration_peak(
    elbow_velocities: &[f64],
    forearm_velocities: &[f64],
    profile: &ImpactProfile,
) -> usize {
    let midpoint = elbow_velocities.len() / 2;
    if elbow_velocities.len() < MIN_VELOCITY_SAMPLES {
        return midpoint;
    }

    let elbow_accel: Vec<f64> = elbow_velocities
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .collect();
    let forearm_accel: Vec<f64> = forearm_velocities
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .collect();

    let weight = profile.forearm_weight;
    let blended: Vec<f64> = elbow_accel
        .iter()
        .zip(&forearm_accel)
        .map(|(e, f)| e * (1.0 - weight) + f * weight)
        .collect();

    if blended.is_empty() {
        return midpoint;
    }

    let start = (blended.len() as f64 * profile.search_region.0) as usize;
    let end = ((blended.len() as f64 * profile.search_region.1) as usize).min(blended.len());
    if start >= end {
        return midpoint;
    }
    let region = &blended[start..end];

    let mut peak = 0;
    for (i, &value) in region.iter().enumerate() {
        if value > region[peak] {
            peak = i;
        }
    }
    start + peak
}

/// Fall back to the frame of maximum wrist-to-shoulder extension.
fn extension_fallback(signals: &ArmSignals) -> PhaseOutcome {
    let mut best: Option<(usize, f64)> = None;
    for (index, extension) in signals.extension.iter().enumerate() {
        let Some(extension) = extension else {
            continue;
        };
        if best.is_none_or(|(_, max)| *extension > max) {
            best = Some((index, *extension));
        }
    }

    match best {
        Some((index, _)) => {
            debug!(index, "impact frame selected by extension fallback");
            PhaseOutcome::Fallback {
                frame_index: index,
                method: FallbackMethod::WristExtension,
            }
        }
        None => PhaseOutcome::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StrokeProfile;
    use topspin_models::{Landmark, Pose, POSE_LANDMARK_COUNT};

    fn forehand() -> ImpactProfile {
        StrokeProfile::forehand().impact
    }

    /// A pose whose right wrist sits at `wrist`, with the shoulder and
    /// elbow fixed; varying the wrist swings both tracked angles.
    fn arm_pose(wrist: (f64, f64)) -> Pose {
        let mut landmarks = vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT];
        landmarks[indices::LEFT_SHOULDER] = Landmark::at(0.3, 0.3);
        landmarks[indices::RIGHT_SHOULDER] = Landmark::at(0.5, 0.3);
        landmarks[indices::RIGHT_ELBOW] = Landmark::at(0.6, 0.4);
        landmarks[indices::RIGHT_WRIST] = Landmark::at(wrist.0, wrist.1);
        Pose::new(landmarks)
    }

    /// A swing: the wrist sweeps smoothly, then jumps sharply at `spike`,
    /// then settles. The angular-velocity change peaks at the jump.
    fn swing_track(total: usize, spike: usize) -> PoseTrack {
        let frames = (0..total)
            .map(|i| {
                let angle = if i < spike {
                    i as f64 * 2.0
                } else {
                    i as f64 * 2.0 + 40.0
                };
                let rad = angle.to_radians();
                Some(arm_pose((0.6 + 0.2 * rad.cos(), 0.4 + 0.2 * rad.sin())))
            })
            .collect();
        PoseTrack::new(frames, 30.0)
    }

    #[test]
    fn test_empty_track_not_found() {
        let track = PoseTrack::empty(30.0);
        assert_eq!(detect(&track, &forehand()), PhaseOutcome::NotFound);
    }

    #[test]
    fn test_detects_velocity_spike() {
        let track = swing_track(40, 20);
        let profile = forehand();

        let outcome = detect(&track, &profile);
        let index = outcome.frame_index().expect("impact selected");
        assert!(
            matches!(outcome, PhaseOutcome::Detected { .. }),
            "expected angular detection, got {:?}",
            outcome
        );
        // The acceleration peak lands at the spike's velocity transition;
        // with every frame valid, the scan then settles on the earliest
        // frame within its radius.
        assert!((10..=17).contains(&index), "index {}", index);
    }

    #[test]
    fn test_sparse_track_uses_extension_fallback() {
        // Only 3 valid frames; the most extended wrist is at index 4.
        let frames = vec![
            Some(arm_pose((0.7, 0.3))),
            None,
            Some(arm_pose((0.8, 0.3))),
            None,
            Some(arm_pose((0.95, 0.3))),
            None,
        ];
        let track = PoseTrack::new(frames, 30.0);

        assert_eq!(
            detect(&track, &forehand()),
            PhaseOutcome::Fallback {
                frame_index: 4,
                method: FallbackMethod::WristExtension,
            }
        );
    }

    #[test]
    fn test_all_frames_missing_not_found() {
        let track = PoseTrack::new(vec![None; 20], 30.0);
        let profile = StrokeProfile::serve().impact;
        assert_eq!(detect(&track, &profile), PhaseOutcome::NotFound);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let track = swing_track(40, 20);
        let profile = forehand();
        assert_eq!(detect(&track, &profile), detect(&track, &profile));
    }

    #[test]
    fn test_angular_velocities_fold_wraparound() {
        // 170 -> -170 is a 20-degree step, not 340.
        let velocities = angular_velocities(&[170.0, -170.0], 30.0);
        assert!((velocities[0] - 20.0 * 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_deceleration_peak_searches_middle_half() {
        // Velocity changes: huge at the edges, modest bump at index 6.
        let velocities = vec![0.0, 500.0, 0.0, 10.0, 10.0, 10.0, 120.0, 10.0, 10.0, 0.0, 500.0, 0.0];
        let flat = vec![0.0; velocities.len()];
        let profile = ImpactProfile {
            forearm_weight: 0.0,
            ..forehand()
        };
        let peak = deceleration_peak(&velocities, &flat, &profile);
        // accel has len 11, middle half is 2..8; the edge spikes at 0-1
        // and 9-10 are excluded.
        assert!((2..8).contains(&peak), "peak {}", peak);
    }
}
