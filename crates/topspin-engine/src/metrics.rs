//! Analysis pipeline metrics.
//!
//! Counters and histograms go through the `metrics` facade; installing a
//! recorder (Prometheus or otherwise) is left to the embedding service.

use metrics::{counter, histogram};

use topspin_models::{PhaseKind, PhaseOutcome, StrokeType};

/// Metric names as constants for consistency.
pub mod names {
    // Analysis lifecycle
    pub const ANALYSES_COMPLETED_TOTAL: &str = "topspin_analyses_completed_total";
    pub const ANALYSES_FAILED_TOTAL: &str = "topspin_analyses_failed_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "topspin_analysis_duration_seconds";
    pub const STAGE_DURATION_SECONDS: &str = "topspin_stage_duration_seconds";

    // Pose extraction
    pub const FRAMES_ANALYZED_TOTAL: &str = "topspin_frames_analyzed_total";
    pub const FRAMES_WITHOUT_POSE_TOTAL: &str = "topspin_frames_without_pose_total";

    // Phase detection
    pub const PHASE_FALLBACKS_TOTAL: &str = "topspin_phase_fallbacks_total";
    pub const PHASES_NOT_FOUND_TOTAL: &str = "topspin_phases_not_found_total";

    // Comparison
    pub const COMPARISONS_MATCHED_TOTAL: &str = "topspin_comparisons_matched_total";
    pub const COMPARISONS_UNMATCHED_TOTAL: &str = "topspin_comparisons_unmatched_total";
}

/// Record a completed analysis.
pub fn record_analysis_completed(stroke: StrokeType, duration_secs: f64) {
    let labels = [("stroke", stroke.as_str().to_string())];
    counter!(names::ANALYSES_COMPLETED_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a failed analysis.
pub fn record_analysis_failed(stroke: StrokeType, category: &str) {
    let labels = [
        ("stroke", stroke.as_str().to_string()),
        ("category", category.to_string()),
    ];
    counter!(names::ANALYSES_FAILED_TOTAL, &labels).increment(1);
}

/// Record one pipeline stage's duration.
pub fn record_stage_duration(stage: &str, duration_secs: f64) {
    let labels = [("stage", stage.to_string())];
    histogram!(names::STAGE_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record pose extraction coverage for one analysis.
pub fn record_frames_analyzed(total: usize, without_pose: usize) {
    counter!(names::FRAMES_ANALYZED_TOTAL).increment(total as u64);
    counter!(names::FRAMES_WITHOUT_POSE_TOTAL).increment(without_pose as u64);
}

/// Record one phase detector's outcome. Detections are the normal case
/// and are not counted; fallbacks and misses are.
pub fn record_phase_outcome(phase: PhaseKind, outcome: &PhaseOutcome) {
    match outcome {
        PhaseOutcome::Detected { .. } => {}
        PhaseOutcome::Fallback { method, .. } => {
            let labels = [
                ("phase", phase.as_str().to_string()),
                ("method", method.as_str().to_string()),
            ];
            counter!(names::PHASE_FALLBACKS_TOTAL, &labels).increment(1);
        }
        PhaseOutcome::NotFound => {
            let labels = [("phase", phase.as_str().to_string())];
            counter!(names::PHASES_NOT_FOUND_TOTAL, &labels).increment(1);
        }
    }
}

/// Record whether comparison found a reference match.
pub fn record_comparison(stroke: StrokeType, matched: bool) {
    let labels = [("stroke", stroke.as_str().to_string())];
    if matched {
        counter!(names::COMPARISONS_MATCHED_TOTAL, &labels).increment(1);
    } else {
        counter!(names::COMPARISONS_UNMATCHED_TOTAL, &labels).increment(1);
    }
}
