//! Engine error types.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the analysis pipeline.
///
/// Per-frame pose misses and per-phase detection misses are not errors;
/// they are recorded in the track and the report. An `EngineError` means
/// the analysis itself could not run to completion.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Media error: {0}")]
    Media(#[from] topspin_media::MediaError),

    #[error("Pose service error: {0}")]
    Pose(#[from] topspin_pose::PoseError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] topspin_analysis::AnalysisError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] topspin_corpus::CorpusError),

    #[error("Analysis timed out after {0} seconds")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short label for the error family, used in metrics and logs.
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::Media(_) => "media",
            EngineError::Pose(_) => "pose",
            EngineError::Analysis(_) => "analysis",
            EngineError::Corpus(_) => "corpus",
            EngineError::Timeout(_) => "timeout",
            EngineError::Config(_) => "config",
            EngineError::Io(_) => "io",
        }
    }
}
