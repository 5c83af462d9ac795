//! Error types for stroke analysis.

use thiserror::Error;
use topspin_models::POSE_LANDMARK_COUNT;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur during stroke analysis.
///
/// Phase detection itself never errors; missing output is expressed as
/// `PhaseOutcome::NotFound`. These variants cover contract violations at
/// the analysis boundaries.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Missing landmarks for normalization: pose has {0} of {POSE_LANDMARK_COUNT}")]
    MissingLandmarks(usize),

    #[error("Empty pose track")]
    EmptyTrack,

    #[error("Invalid stroke profile: {0}")]
    InvalidProfile(String),
}
