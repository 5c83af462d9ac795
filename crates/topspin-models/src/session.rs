//! Analysis session lifecycle types.
//!
//! One analysis request is tracked as an `AnalysisRecord` in an explicit
//! session store owned by the engine; there is no process-global job state.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::stroke::{Handedness, StrokeType};

/// Unique identifier for one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnalysisId(pub String);

impl AnalysisId {
    /// Generate a new random analysis ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stage of one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    /// Accepted, not yet started.
    #[default]
    Queued,
    /// Probing and decoding the input video.
    Probing,
    /// Running pose inference over the sampled frames.
    ExtractingPoses,
    /// Running the three phase detectors.
    DetectingPhases,
    /// Searching the reference corpus.
    Comparing,
    /// Finished with a report.
    Completed,
    /// Finished with an error.
    Failed,
}

impl AnalysisState {
    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisState::Queued => "queued",
            AnalysisState::Probing => "probing",
            AnalysisState::ExtractingPoses => "extracting_poses",
            AnalysisState::DetectingPhases => "detecting_phases",
            AnalysisState::Comparing => "comparing",
            AnalysisState::Completed => "completed",
            AnalysisState::Failed => "failed",
        }
    }

    /// True once the request can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Completed | AnalysisState::Failed)
    }
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One analysis request as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisRequest {
    /// Request identifier.
    pub id: AnalysisId,

    /// Path to the recorded stroke video.
    pub video_path: PathBuf,

    /// Stroke type declared by the user.
    pub stroke_type: StrokeType,

    /// Handedness declared by the user.
    #[serde(default)]
    pub handedness: Handedness,

    /// Trim the track to a single stroke when the recording covers a longer
    /// rally. Ignored when no stroke boundaries are found.
    #[serde(default)]
    pub trim_rally: bool,
}

impl AnalysisRequest {
    /// Create a request with a fresh id.
    pub fn new(video_path: impl Into<PathBuf>, stroke_type: StrokeType) -> Self {
        Self {
            id: AnalysisId::new(),
            video_path: video_path.into(),
            stroke_type,
            handedness: Handedness::default(),
            trim_rally: false,
        }
    }

    /// Set the handedness.
    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    /// Enable rally trimming.
    pub fn with_rally_trim(mut self) -> Self {
        self.trim_rally = true;
        self
    }
}

/// Stored lifecycle record of one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisRecord {
    /// Request identifier.
    pub id: AnalysisId,

    /// Stroke type being analyzed.
    pub stroke_type: StrokeType,

    /// Handedness of the request.
    pub handedness: Handedness,

    /// Current stage.
    #[serde(default)]
    pub state: AnalysisState,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,

    /// Error message (if failed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AnalysisRecord {
    /// Create a queued record for a request.
    pub fn new(request: &AnalysisRequest) -> Self {
        let now = Utc::now();
        Self {
            id: request.id.clone(),
            stroke_type: request.stroke_type,
            handedness: request.handedness,
            state: AnalysisState::Queued,
            created_at: now,
            updated_at: now,
            error_message: None,
        }
    }

    /// Move to a new state, refreshing the update timestamp.
    pub fn advance(&mut self, state: AnalysisState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Mark failed with a message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = AnalysisState::Failed;
        self.error_message = Some(message.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_lifecycle() {
        let request = AnalysisRequest::new("/tmp/stroke.mp4", StrokeType::Forehand);
        let mut record = AnalysisRecord::new(&request);
        assert_eq!(record.state, AnalysisState::Queued);
        assert!(!record.state.is_terminal());

        record.advance(AnalysisState::Comparing);
        assert_eq!(record.state, AnalysisState::Comparing);

        record.fail("pose service unreachable");
        assert!(record.state.is_terminal());
        assert_eq!(record.error_message.as_deref(), Some("pose service unreachable"));
    }

    #[test]
    fn test_analysis_ids_are_unique() {
        assert_ne!(AnalysisId::new(), AnalysisId::new());
    }

    #[test]
    fn test_request_builders() {
        let request = AnalysisRequest::new("/videos/serve.mp4", StrokeType::Serve)
            .with_handedness(Handedness::Left)
            .with_rally_trim();
        assert_eq!(request.handedness, Handedness::Left);
        assert!(request.trim_rally);
    }
}
