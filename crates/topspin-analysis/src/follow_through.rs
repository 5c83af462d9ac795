//! Follow-through detection.
//!
//! The finish is scored as arm extension (elbow angle rescaled from
//! [60, 180] degrees into [0, 1]) blended with how close the wrist sits
//! to the stroke's expected finish position. Only the second half of the
//! track is searched. Candidates near the maximum score are preferred
//! when the wrist has stabilized (five consecutive sub-threshold steps);
//! otherwise the best-scoring frame is taken, with a fixed temporal
//! position as the last resort.

use tracing::debug;

use topspin_models::indices;
use topspin_models::{FallbackMethod, PhaseOutcome, PoseTrack};

use crate::geometry::{joint_angle_degrees, point_distance};
use crate::profile::FollowThroughProfile;

/// Elbow angle treated as fully flexed; extension spans 120 degrees above it.
const FLEXED_ELBOW_DEGREES: f64 = 60.0;
const EXTENSION_SPAN_DEGREES: f64 = 120.0;
/// Minimum track length for biomechanical scoring.
const MIN_FRAMES: usize = 10;

/// Detect the follow-through frame in a canonicalized track.
pub fn detect(track: &PoseTrack, profile: &FollowThroughProfile) -> PhaseOutcome {
    let total = track.len();
    if total == 0 {
        return PhaseOutcome::NotFound;
    }
    if total < MIN_FRAMES {
        debug!(total, "track too short, using midpoint");
        return PhaseOutcome::Fallback {
            frame_index: total / 2,
            method: FallbackMethod::SequenceMidpoint,
        };
    }

    let (scores, wrists) = score_frames(track, profile);

    let start = ((total as f64 * profile.search_start_fraction) as usize).min(total);
    let window = &scores[start..];

    let mut max_score = 0.0_f64;
    for &score in window {
        max_score = max_score.max(score);
    }
    if max_score <= 0.0 {
        // No scoring pose in the search window.
        debug!("no valid follow-through candidates, using temporal position");
        return PhaseOutcome::Fallback {
            frame_index: (total as f64 * profile.temporal_fallback_fraction) as usize,
            method: FallbackMethod::TemporalPosition,
        };
    }

    let threshold = max_score * profile.candidate_score_fraction;

    // Prefer the best-scoring candidate whose wrist has settled.
    let mut best_stable: Option<(usize, f64)> = None;
    for (offset, &score) in window.iter().enumerate() {
        if score < threshold {
            continue;
        }
        let index = start + offset;
        if is_stabilized(&wrists, index, profile)
            && best_stable.is_none_or(|(_, best)| score > best)
        {
            best_stable = Some((index, score));
        }
    }
    if let Some((index, score)) = best_stable {
        debug!(index, score, "stabilized follow-through frame selected");
        return PhaseOutcome::Detected { frame_index: index };
    }

    // No stabilized candidate; take the window's best score.
    let mut best = 0;
    for (offset, &score) in window.iter().enumerate() {
        if score > window[best] {
            best = offset;
        }
    }
    let index = start + best;
    debug!(index, "follow-through frame selected without stabilization");
    PhaseOutcome::Detected { frame_index: index }
}

/// Per-frame composite scores and wrist positions. Frames without a
/// usable pose score 0.0 and record no wrist.
fn score_frames(
    track: &PoseTrack,
    profile: &FollowThroughProfile,
) -> (Vec<f64>, Vec<Option<(f64, f64)>>) {
    let mut scores = Vec::with_capacity(track.len());
    let mut wrists = Vec::with_capacity(track.len());

    for index in 0..track.len() {
        let Some(pose) = track.pose(index) else {
            scores.push(0.0);
            wrists.push(None);
            continue;
        };
        let lm = pose.landmarks();
        let shoulder = lm[indices::RIGHT_SHOULDER].point();
        let elbow = lm[indices::RIGHT_ELBOW].point();
        let wrist = lm[indices::RIGHT_WRIST].point();

        let elbow_angle = joint_angle_degrees(shoulder, elbow, wrist);
        let extension =
            ((elbow_angle - FLEXED_ELBOW_DEGREES) / EXTENSION_SPAN_DEGREES).clamp(0.0, 1.0);

        let offset = (wrist.0 - shoulder.0, wrist.1 - shoulder.1);
        let position = (1.0 - point_distance(offset, profile.wrist_target)).max(0.0);

        scores.push(profile.extension_weight * extension + profile.position_weight * position);
        wrists.push(Some(wrist));
    }

    (scores, wrists)
}

/// True when the wrist barely moved over the profile's stability steps:
/// every window position present, every consecutive displacement under
/// the epsilon.
fn is_stabilized(
    wrists: &[Option<(f64, f64)>],
    index: usize,
    profile: &FollowThroughProfile,
) -> bool {
    let steps = profile.stability_steps;
    if index < steps {
        return false;
    }
    let window: Vec<(f64, f64)> = wrists[index - steps..=index]
        .iter()
        .flatten()
        .copied()
        .collect();
    if window.len() <= steps {
        return false;
    }
    window
        .windows(2)
        .all(|pair| point_distance(pair[0], pair[1]) < profile.stability_epsilon)
}
