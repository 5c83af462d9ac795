//! Corpus error types.

use thiserror::Error;

/// Result type for corpus operations.
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Errors that can occur while writing to the corpus.
///
/// Reads are tolerant: a missing or unreadable record loads as an absent
/// phase, and an unreadable root loads as an empty corpus, so the caller
/// can degrade to the no-reference sentinel. Only write operations surface
/// these errors.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to write record {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CorpusError {
    pub fn write_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}
