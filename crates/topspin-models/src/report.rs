//! The assembled analysis report returned to the caller.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::comparison::ComparisonResult;
use crate::detection::PhaseOutcome;
use crate::session::AnalysisId;
use crate::stroke::{Handedness, PhaseKind, StrokeType};

/// Summary of the analyzed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoSummary {
    /// Source duration in seconds.
    pub duration_secs: f64,
    /// Effective frame rate of the analyzed track.
    pub fps: f64,
    /// Number of frames analyzed.
    pub frames_analyzed: usize,
    /// Number of frames with a complete pose.
    pub frames_with_pose: usize,
}

/// One phase's detection result in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseReport {
    /// Phase this entry describes.
    pub phase: PhaseKind,
    /// Detection outcome.
    pub outcome: PhaseOutcome,
    /// Timestamp of the selected frame, when one was selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_secs: Option<f64>,
}

/// Complete result of one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// Request identifier.
    pub analysis_id: AnalysisId,

    /// Stroke type analyzed.
    pub stroke_type: StrokeType,

    /// Handedness of the request.
    pub handedness: Handedness,

    /// Properties of the analyzed video.
    pub video: VideoSummary,

    /// Per-phase detection results in temporal order.
    pub phases: Vec<PhaseReport>,

    /// Result of the reference corpus comparison.
    pub comparison: ComparisonResult,

    /// Wall-clock duration of the analysis in milliseconds.
    pub elapsed_ms: u64,

    /// When the report was produced.
    pub created_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// The outcome for a phase, if present in the report.
    pub fn phase_outcome(&self, kind: PhaseKind) -> Option<&PhaseOutcome> {
        self.phases
            .iter()
            .find(|p| p.phase == kind)
            .map(|p| &p.outcome)
    }

    /// Number of phases for which a frame was selected.
    pub fn detected_phase_count(&self) -> usize {
        self.phases.iter().filter(|p| p.outcome.is_found()).count()
    }
}
