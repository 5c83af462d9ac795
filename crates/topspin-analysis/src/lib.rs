//! Stroke analysis: phase detection, normalization and reference matching.
//!
//! This crate provides:
//! - Per-stroke detection profiles (search windows, targets, tolerances)
//! - The three phase detectors (preparation, impact, follow-through) with
//!   tiered fallbacks
//! - Rally trimming to isolate the stroke inside a longer point
//! - Body-frame keypoint normalization
//! - Elastic alignment of phase poses and best-match search over a
//!   reference corpus
//! - User-facing feedback text assembly
//!
//! Detection operates on a [`topspin_models::PoseTrack`] already
//! canonicalized for handedness, so the dominant arm always reads from the
//! right-side landmark indices.

pub mod align;
pub mod error;
pub mod feedback;
pub mod follow_through;
pub mod geometry;
pub mod impact;
pub mod matcher;
pub mod normalize;
pub mod phases;
pub mod preparation;
pub mod profile;
pub mod rally;
pub mod smoothing;

pub use align::{compare_phase, dtw_distance};
pub use error::{AnalysisError, AnalysisResult};
pub use feedback::{
    build_comparison_result, comparison_feedback, phase_feedback_line, IMPACT_MISSING_FEEDBACK,
    NO_REFERENCE_FEEDBACK,
};
pub use matcher::{find_best_match, StrokeMatch};
pub use normalize::{normalize_pose, NormalizedPose};
pub use phases::{DetectedPhases, PhaseDetector};
pub use profile::{FollowThroughProfile, ImpactProfile, PreparationProfile, StrokeProfile};
pub use rally::{locate_stroke, RallyBounds};
