//! Stroke samples: the per-phase pose records of one stroke.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::landmark::Pose;
use crate::stroke::PhaseKind;

/// Up to three named poses (preparation / impact / follow-through) for one
/// video. Any phase may be absent; a comparison only proceeds for phases
/// present on both sides.
///
/// A user request's sample is transient; reference corpus samples are
/// long-lived and read many times per request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct StrokeSample {
    /// Take-back pose, if detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<Pose>,

    /// Contact pose, if detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Pose>,

    /// Swing-completion pose, if detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_through: Option<Pose>,
}

impl StrokeSample {
    /// Create an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pose for a phase, if present.
    pub fn phase(&self, kind: PhaseKind) -> Option<&Pose> {
        match kind {
            PhaseKind::Preparation => self.preparation.as_ref(),
            PhaseKind::Impact => self.impact.as_ref(),
            PhaseKind::FollowThrough => self.follow_through.as_ref(),
        }
    }

    /// Set the pose for a phase.
    pub fn set_phase(&mut self, kind: PhaseKind, pose: Pose) {
        match kind {
            PhaseKind::Preparation => self.preparation = Some(pose),
            PhaseKind::Impact => self.impact = Some(pose),
            PhaseKind::FollowThrough => self.follow_through = Some(pose),
        }
    }

    /// Builder-style phase setter.
    pub fn with_phase(mut self, kind: PhaseKind, pose: Pose) -> Self {
        self.set_phase(kind, pose);
        self
    }

    /// True if all three phases are present.
    pub fn is_complete(&self) -> bool {
        self.preparation.is_some() && self.impact.is_some() && self.follow_through.is_some()
    }

    /// Phases present in this sample, in temporal order.
    pub fn present_phases(&self) -> Vec<PhaseKind> {
        PhaseKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.phase(*kind).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, POSE_LANDMARK_COUNT};

    fn pose() -> Pose {
        Pose::new(vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT])
    }

    #[test]
    fn test_phase_accessors() {
        let mut sample = StrokeSample::new();
        assert!(sample.phase(PhaseKind::Impact).is_none());
        assert!(!sample.is_complete());

        sample.set_phase(PhaseKind::Impact, pose());
        assert!(sample.phase(PhaseKind::Impact).is_some());
        assert_eq!(sample.present_phases(), vec![PhaseKind::Impact]);
    }

    #[test]
    fn test_completeness() {
        let sample = StrokeSample::new()
            .with_phase(PhaseKind::Preparation, pose())
            .with_phase(PhaseKind::Impact, pose())
            .with_phase(PhaseKind::FollowThrough, pose());
        assert!(sample.is_complete());
        assert_eq!(sample.present_phases().len(), 3);
    }

    #[test]
    fn test_serde_skips_absent_phases() {
        let sample = StrokeSample::new().with_phase(PhaseKind::Preparation, pose());
        let json = serde_json::to_string(&sample).expect("serialize");
        assert!(json.contains("preparation"));
        assert!(!json.contains("impact"));

        let decoded: StrokeSample = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(sample, decoded);
    }
}
