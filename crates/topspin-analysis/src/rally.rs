//! Rally segmentation.
//!
//! Isolates one stroke inside a longer rally by walking the track once:
//! the first frame whose elbow angle falls in the take-back band marks
//! the start, the running maximum of wrist-to-shoulder extension tracks
//! the likely contact point, and the first frame after that maximum
//! where the arm folds back up closes the segment.

use tracing::debug;

use topspin_models::indices;
use topspin_models::PoseTrack;

use crate::geometry::{joint_angle_degrees, point_distance};

/// Elbow-angle band marking the take-back, degrees (exclusive bounds).
const PREPARATION_BAND_DEGREES: (f64, f64) = (60.0, 110.0);
/// Elbow angle under which the arm counts as folded after contact.
const FOLLOW_MAX_DEGREES: f64 = 80.0;

/// Frame bounds of one stroke within a rally track, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RallyBounds {
    pub start: usize,
    pub end: usize,
}

impl RallyBounds {
    /// Number of frames covered.
    pub fn frame_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Locate a single stroke in the track.
///
/// Returns `None` when no complete take-back/contact/fold sequence is
/// observed; the caller then analyzes the full track instead.
pub fn locate_stroke(track: &PoseTrack) -> Option<RallyBounds> {
    let mut preparation: Option<usize> = None;
    let mut max_extension = f64::NEG_INFINITY;
    let mut impact_hint: Option<usize> = None;

    for index in 0..track.len() {
        let Some(pose) = track.pose(index) else {
            continue;
        };
        let lm = pose.landmarks();
        let shoulder = lm[indices::RIGHT_SHOULDER].point();
        let elbow = lm[indices::RIGHT_ELBOW].point();
        let wrist = lm[indices::RIGHT_WRIST].point();

        let angle = joint_angle_degrees(shoulder, elbow, wrist);

        if preparation.is_none()
            && angle > PREPARATION_BAND_DEGREES.0
            && angle < PREPARATION_BAND_DEGREES.1
        {
            preparation = Some(index);
        }

        let extension = point_distance(shoulder, wrist);
        if extension > max_extension {
            max_extension = extension;
            impact_hint = Some(index);
        }

        if let (Some(start), Some(hint)) = (preparation, impact_hint) {
            if index > hint && angle < FOLLOW_MAX_DEGREES {
                debug!(start, end = index, hint, "stroke segment located");
                return Some(RallyBounds { start, end: index });
            }
        }
    }

    debug!("no complete stroke sequence in rally");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use topspin_models::{Landmark, Pose, POSE_LANDMARK_COUNT};

    /// Pose with a given elbow angle, placed on a unit geometry where the
    /// wrist orbits the elbow. Extension grows with the angle.
    fn pose_with_elbow_angle(degrees: f64) -> Pose {
        let mut landmarks = vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT];
        let shoulder = (0.5, 0.3);
        let elbow = (0.5, 0.45);
        // Shoulder sits straight above the elbow; rotate the wrist around
        // the elbow by the requested interior angle.
        let rad = (180.0 - degrees).to_radians();
        let wrist = (elbow.0 + 0.15 * rad.sin(), elbow.1 + 0.15 * rad.cos());
        landmarks[indices::LEFT_SHOULDER] = Landmark::at(0.3, 0.3);
        landmarks[indices::RIGHT_SHOULDER] = Landmark::at(shoulder.0, shoulder.1);
        landmarks[indices::RIGHT_ELBOW] = Landmark::at(elbow.0, elbow.1);
        landmarks[indices::RIGHT_WRIST] = Landmark::at(wrist.0, wrist.1);
        Pose::new(landmarks)
    }

    fn track_of(angles: &[f64]) -> PoseTrack {
        PoseTrack::new(
            angles
                .iter()
                .map(|&a| Some(pose_with_elbow_angle(a)))
                .collect(),
            30.0,
        )
    }

    #[test]
    fn test_locates_full_stroke() {
        // Fold at 40, take-back near 90, extend through contact at 170,
        // then fold back under 80.
        let track = track_of(&[40.0, 50.0, 90.0, 120.0, 150.0, 170.0, 120.0, 70.0]);

        let bounds = locate_stroke(&track).expect("stroke located");
        assert_eq!(bounds.start, 2);
        assert_eq!(bounds.end, 7);
        assert_eq!(bounds.frame_count(), 6);
    }

    #[test]
    fn test_take_back_at_first_frame_counts() {
        // The take-back band can open the segment at index 0.
        let track = track_of(&[90.0, 130.0, 170.0, 60.0]);

        let bounds = locate_stroke(&track).expect("stroke located");
        assert_eq!(bounds.start, 0);
        assert_eq!(bounds.end, 3);
    }

    #[test]
    fn test_no_fold_after_contact_returns_none() {
        // The arm never folds back under 80 after maximum extension.
        let track = track_of(&[90.0, 120.0, 150.0, 170.0, 175.0]);
        assert!(locate_stroke(&track).is_none());
    }

    #[test]
    fn test_no_take_back_returns_none() {
        // Angles never enter the 60-110 band.
        let track = track_of(&[120.0, 150.0, 170.0, 40.0]);
        assert!(locate_stroke(&track).is_none());
    }

    #[test]
    fn test_invalid_frames_skipped() {
        let mut frames: Vec<Option<Pose>> = track_of(&[90.0, 130.0, 170.0, 60.0]).frames;
        frames.insert(1, None);
        let track = PoseTrack::new(frames, 30.0);

        let bounds = locate_stroke(&track).expect("stroke located");
        assert_eq!(bounds.start, 0);
        assert_eq!(bounds.end, 4);
    }

    #[test]
    fn test_empty_track_returns_none() {
        assert!(locate_stroke(&PoseTrack::empty(30.0)).is_none());
    }
}
