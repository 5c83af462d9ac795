//! Shared data models for the topspin stroke analysis engine.
//!
//! This crate provides Serde-serializable types for:
//! - Pose landmarks and per-frame poses
//! - Stroke taxonomy (stroke type, phase, handedness)
//! - Pose tracks and stroke samples
//! - Phase detection outcomes with named fallback tiers
//! - Reference corpus entries and comparison results
//! - Analysis session records and the final report

pub mod comparison;
pub mod detection;
pub mod landmark;
pub mod reference;
pub mod report;
pub mod sample;
pub mod session;
pub mod stroke;
pub mod track;

// Re-export common types
pub use comparison::{
    ComparisonResult, DistanceTier, JointDeviation, JointSide, PhaseComparison,
    DEVIATION_THRESHOLD_DEGREES, EXCELLENT_DISTANCE_MAX, MODERATE_DISTANCE_MAX,
};
pub use detection::{FallbackMethod, PhaseOutcome};
pub use landmark::{indices, Landmark, Pose, COMPARISON_INDICES, POSE_LANDMARK_COUNT};
pub use reference::{ReferenceEntry, ReferenceId};
pub use report::{AnalysisReport, PhaseReport, VideoSummary};
pub use sample::StrokeSample;
pub use session::{AnalysisId, AnalysisRecord, AnalysisRequest, AnalysisState};
pub use stroke::{Handedness, PhaseKind, StrokeType};
pub use track::PoseTrack;
