//! Structured analysis logging.
//!
//! Provides consistent logging for pipeline runs with the analysis id and
//! stroke type attached to every event.

use tracing::{error, info, warn, Span};

use topspin_models::{AnalysisId, StrokeType};

/// Logger carrying the context of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    analysis_id: String,
    stroke_type: String,
}

impl AnalysisLogger {
    /// Create a logger for one analysis.
    pub fn new(analysis_id: &AnalysisId, stroke_type: StrokeType) -> Self {
        Self {
            analysis_id: analysis_id.to_string(),
            stroke_type: stroke_type.as_str().to_string(),
        }
    }

    /// Log the start of an analysis.
    pub fn log_start(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            stroke_type = %self.stroke_type,
            "Analysis started: {}", message
        );
    }

    /// Log a pipeline stage transition.
    pub fn log_stage(&self, stage: &str, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            stroke_type = %self.stroke_type,
            stage = %stage,
            "Analysis progress: {}", message
        );
    }

    /// Log a warning during the analysis.
    pub fn log_warning(&self, message: &str) {
        warn!(
            analysis_id = %self.analysis_id,
            stroke_type = %self.stroke_type,
            "Analysis warning: {}", message
        );
    }

    /// Log an error during the analysis.
    pub fn log_error(&self, message: &str) {
        error!(
            analysis_id = %self.analysis_id,
            stroke_type = %self.stroke_type,
            "Analysis error: {}", message
        );
    }

    /// Log the completion of an analysis.
    pub fn log_completion(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            stroke_type = %self.stroke_type,
            "Analysis completed: {}", message
        );
    }

    /// Get the analysis ID.
    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }

    /// Get the stroke type.
    pub fn stroke_type(&self) -> &str {
        &self.stroke_type
    }

    /// Create a tracing span for this analysis.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "analysis",
            analysis_id = %self.analysis_id,
            stroke_type = %self.stroke_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_carries_context() {
        let id = AnalysisId::new();
        let logger = AnalysisLogger::new(&id, StrokeType::Backhand);

        assert_eq!(logger.analysis_id(), id.to_string());
        assert_eq!(logger.stroke_type(), "backhand");
    }
}
