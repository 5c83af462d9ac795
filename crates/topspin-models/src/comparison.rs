//! Comparison results against the reference corpus.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stroke::PhaseKind;

/// Aggregate DTW distance below which a phase is an excellent match.
pub const EXCELLENT_DISTANCE_MAX: f64 = 20.0;

/// Aggregate DTW distance below which a phase shows moderate differences.
pub const MODERATE_DISTANCE_MAX: f64 = 65.0;

/// Elbow-angle delta (degrees) above which a deviation is flagged.
pub const DEVIATION_THRESHOLD_DEGREES: f64 = 15.0;

/// Similarity classification of one phase's alignment distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DistanceTier {
    /// Distance below 20: near-identical mechanics.
    Excellent,
    /// Distance below 65: visible but moderate differences.
    Moderate,
    /// Distance 65 or above: significant differences.
    High,
}

impl DistanceTier {
    /// Classify an alignment distance.
    pub fn from_distance(distance: f64) -> Self {
        if distance < EXCELLENT_DISTANCE_MAX {
            DistanceTier::Excellent
        } else if distance < MODERATE_DISTANCE_MAX {
            DistanceTier::Moderate
        } else {
            DistanceTier::High
        }
    }

    /// Returns the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceTier::Excellent => "excellent",
            DistanceTier::Moderate => "moderate",
            DistanceTier::High => "high",
        }
    }
}

impl fmt::Display for DistanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body side of a flagged joint deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JointSide {
    Left,
    Right,
}

impl JointSide {
    /// Returns the side name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            JointSide::Left => "left",
            JointSide::Right => "right",
        }
    }

    /// Capitalized label used in feedback text.
    pub fn label(&self) -> &'static str {
        match self {
            JointSide::Left => "Left",
            JointSide::Right => "Right",
        }
    }
}

/// A joint angle that differs from the reference by more than the
/// deviation threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JointDeviation {
    /// Which elbow deviates.
    pub side: JointSide,
    /// Absolute angle difference in degrees.
    pub delta_degrees: f64,
}

impl JointDeviation {
    /// Create a deviation record.
    pub fn new(side: JointSide, delta_degrees: f64) -> Self {
        Self { side, delta_degrees }
    }
}

/// One phase's alignment against the matched reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseComparison {
    /// Phase being compared.
    pub phase: PhaseKind,
    /// Elastic alignment distance for this phase.
    pub distance: f64,
    /// Similarity classification of the distance.
    pub tier: DistanceTier,
    /// Elbow deviations above the flagging threshold.
    #[serde(default)]
    pub deviations: Vec<JointDeviation>,
}

impl PhaseComparison {
    /// Create a phase comparison, classifying the distance.
    pub fn new(phase: PhaseKind, distance: f64, deviations: Vec<JointDeviation>) -> Self {
        Self {
            phase,
            distance,
            tier: DistanceTier::from_distance(distance),
            deviations,
        }
    }
}

/// The outcome of searching the reference corpus for one user sample.
///
/// When no corpus entry qualifies the result is the no-reference sentinel
/// (`matched_reference_id` absent, sentinel feedback text) rather than an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonResult {
    /// Identifier of the best-matching corpus entry, if any qualified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_reference_id: Option<String>,

    /// Asset path of the matched reference clip, resolved through the
    /// corpus manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_clip: Option<String>,

    /// Sum of the three per-phase distances for the matched entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,

    /// Per-phase breakdown against the matched entry.
    #[serde(default)]
    pub phases: Vec<PhaseComparison>,

    /// Assembled user-facing feedback text.
    pub feedback: String,
}

impl ComparisonResult {
    /// Sentinel result for an empty or inapplicable corpus.
    pub fn no_reference(feedback: impl Into<String>) -> Self {
        Self {
            matched_reference_id: None,
            reference_clip: None,
            total_distance: None,
            phases: Vec::new(),
            feedback: feedback.into(),
        }
    }

    /// True if a corpus entry was matched.
    pub fn is_match(&self) -> bool {
        self.matched_reference_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(DistanceTier::from_distance(0.0), DistanceTier::Excellent);
        assert_eq!(DistanceTier::from_distance(19.9), DistanceTier::Excellent);
        assert_eq!(DistanceTier::from_distance(20.0), DistanceTier::Moderate);
        assert_eq!(DistanceTier::from_distance(64.9), DistanceTier::Moderate);
        assert_eq!(DistanceTier::from_distance(65.0), DistanceTier::High);
        assert_eq!(DistanceTier::from_distance(200.0), DistanceTier::High);
    }

    #[test]
    fn test_phase_comparison_classifies() {
        let cmp = PhaseComparison::new(PhaseKind::Impact, 12.5, Vec::new());
        assert_eq!(cmp.tier, DistanceTier::Excellent);

        let cmp = PhaseComparison::new(
            PhaseKind::Preparation,
            70.0,
            vec![JointDeviation::new(JointSide::Right, 22.0)],
        );
        assert_eq!(cmp.tier, DistanceTier::High);
        assert_eq!(cmp.deviations.len(), 1);
    }

    #[test]
    fn test_no_reference_sentinel() {
        let result = ComparisonResult::no_reference("No reference videos found for comparison.");
        assert!(!result.is_match());
        assert!(result.total_distance.is_none());
        assert!(result.phases.is_empty());

        let json = serde_json::to_string(&result).expect("serialize");
        assert!(!json.contains("matched_reference_id"));
        let decoded: ComparisonResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(result, decoded);
    }
}
