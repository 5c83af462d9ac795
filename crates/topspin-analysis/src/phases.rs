//! Phase detection facade.
//!
//! Bundles the three detectors behind one entry point so callers deal with
//! a stroke type and a track, not with individual detector tunables.

use tracing::{debug, info};

use topspin_models::{PhaseKind, PhaseOutcome, PoseTrack, StrokeSample, StrokeType};

use crate::error::AnalysisResult;
use crate::follow_through;
use crate::impact;
use crate::preparation;
use crate::profile::StrokeProfile;

/// The three detector outcomes for one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedPhases {
    pub preparation: PhaseOutcome,
    pub impact: PhaseOutcome,
    pub follow_through: PhaseOutcome,
}

impl DetectedPhases {
    /// The outcome for one phase.
    pub fn outcome(&self, kind: PhaseKind) -> PhaseOutcome {
        match kind {
            PhaseKind::Preparation => self.preparation,
            PhaseKind::Impact => self.impact,
            PhaseKind::FollowThrough => self.follow_through,
        }
    }

    /// How many phases resolved to a frame, via either path.
    pub fn found_count(&self) -> usize {
        PhaseKind::ALL
            .iter()
            .filter(|kind| self.outcome(**kind).is_found())
            .count()
    }
}

/// Runs the three phase detectors with one stroke's profile.
#[derive(Debug, Clone)]
pub struct PhaseDetector {
    profile: StrokeProfile,
}

impl PhaseDetector {
    /// Detector with the preset profile for a stroke type.
    pub fn new(stroke_type: StrokeType) -> Self {
        Self {
            profile: StrokeProfile::for_stroke(stroke_type),
        }
    }

    /// Detector with an explicit profile.
    ///
    /// Custom profiles are validated; presets always pass.
    pub fn with_profile(profile: StrokeProfile) -> AnalysisResult<Self> {
        profile.validate()?;
        Ok(Self { profile })
    }

    /// The active profile.
    pub fn profile(&self) -> &StrokeProfile {
        &self.profile
    }

    /// Run all three detectors over a track.
    pub fn detect_all(&self, track: &PoseTrack) -> DetectedPhases {
        let preparation = preparation::detect(track, &self.profile.preparation);
        debug!(outcome = ?preparation, "Preparation detection finished");

        let impact = impact::detect(track, &self.profile.impact);
        debug!(outcome = ?impact, "Impact detection finished");

        let follow_through = follow_through::detect(track, &self.profile.follow_through);
        debug!(outcome = ?follow_through, "Follow-through detection finished");

        let phases = DetectedPhases {
            preparation,
            impact,
            follow_through,
        };
        info!(
            stroke = %self.profile.stroke_type,
            frames = track.len(),
            valid_frames = track.valid_count(),
            found = phases.found_count(),
            "Phase detection complete"
        );
        phases
    }

    /// Extract the per-phase poses selected by `phases`.
    ///
    /// A phase lands in the sample only when its outcome selected a frame
    /// and that frame actually carries a complete pose; fallback indices
    /// over invalid frames leave the phase absent.
    pub fn sample_from(&self, track: &PoseTrack, phases: &DetectedPhases) -> StrokeSample {
        let mut sample = StrokeSample::new();
        for kind in PhaseKind::ALL {
            let Some(frame_index) = phases.outcome(*kind).frame_index() else {
                continue;
            };
            match track.pose(frame_index) {
                Some(pose) => sample.set_phase(*kind, pose.clone()),
                None => debug!(
                    phase = %kind,
                    frame_index,
                    "Selected frame has no usable pose, leaving phase absent"
                ),
            }
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topspin_models::{FallbackMethod, Landmark, Pose, POSE_LANDMARK_COUNT};

    fn complete_pose() -> Pose {
        Pose::new(vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT])
    }

    #[test]
    fn test_presets_carry_stroke_type() {
        let detector = PhaseDetector::new(StrokeType::Serve);
        assert_eq!(detector.profile().stroke_type, StrokeType::Serve);
    }

    #[test]
    fn test_custom_profile_is_validated() {
        let mut profile = StrokeProfile::forehand();
        profile.preparation.shoulder_weight = 0.9;
        assert!(PhaseDetector::with_profile(profile).is_err());

        let mut profile = StrokeProfile::backhand();
        profile.preparation.elbow_tolerance_degrees = 25.0;
        let detector = PhaseDetector::with_profile(profile).expect("valid profile");
        assert_eq!(detector.profile().stroke_type, StrokeType::Backhand);
    }

    #[test]
    fn test_empty_track_finds_nothing() {
        let detector = PhaseDetector::new(StrokeType::Forehand);
        let track = PoseTrack::empty(30.0);

        let phases = detector.detect_all(&track);
        assert_eq!(phases.found_count(), 0);
        assert!(!detector.sample_from(&track, &phases).is_complete());
    }

    #[test]
    fn test_invalid_frames_leave_fallback_phases_out_of_sample() {
        // Six frames, none with a pose: the follow-through midpoint
        // fallback still names a frame, but no pose can be extracted.
        let detector = PhaseDetector::new(StrokeType::Forehand);
        let track = PoseTrack::new(vec![None; 6], 30.0);

        let phases = detector.detect_all(&track);
        assert_eq!(phases.preparation, PhaseOutcome::NotFound);
        assert_eq!(phases.impact, PhaseOutcome::NotFound);
        assert_eq!(
            phases.follow_through,
            PhaseOutcome::Fallback {
                frame_index: 3,
                method: FallbackMethod::SequenceMidpoint
            }
        );

        let sample = detector.sample_from(&track, &phases);
        assert!(sample.present_phases().is_empty());
    }

    #[test]
    fn test_sample_picks_poses_at_selected_frames() {
        let detector = PhaseDetector::new(StrokeType::Forehand);
        let mut frames: Vec<Option<Pose>> = vec![None; 10];
        frames[2] = Some(complete_pose());
        frames[5] = Some(complete_pose());
        let track = PoseTrack::new(frames, 30.0);

        let phases = DetectedPhases {
            preparation: PhaseOutcome::Detected { frame_index: 2 },
            impact: PhaseOutcome::Detected { frame_index: 5 },
            follow_through: PhaseOutcome::Fallback {
                frame_index: 8,
                method: FallbackMethod::TemporalPosition,
            },
        };

        let sample = detector.sample_from(&track, &phases);
        assert!(sample.preparation.is_some());
        assert!(sample.impact.is_some());
        // Frame 8 holds no pose, so the phase stays absent.
        assert!(sample.follow_through.is_none());
        assert_eq!(
            sample.present_phases(),
            vec![PhaseKind::Preparation, PhaseKind::Impact]
        );
    }
}
