//! Phase detection outcomes.
//!
//! Each detector resolves to exactly one of three named outcomes instead of
//! nested branch handling: the biomechanical score picked a frame
//! (`Detected`), a degraded heuristic picked one (`Fallback` with the
//! method that produced it), or nothing usable was found (`NotFound`).
//! Absence is the sole failure signal; detectors never error for a
//! decodable video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Degraded selection method used when the primary biomechanical pass
/// cannot choose a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMethod {
    /// Frame of maximum wrist-to-shoulder distance over the whole sequence.
    WristExtension,
    /// Midpoint of the sequence (too few valid frames to score).
    SequenceMidpoint,
    /// Fixed temporal position near the end of the sequence.
    TemporalPosition,
}

impl FallbackMethod {
    /// Returns the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackMethod::WristExtension => "wrist_extension",
            FallbackMethod::SequenceMidpoint => "sequence_midpoint",
            FallbackMethod::TemporalPosition => "temporal_position",
        }
    }
}

impl fmt::Display for FallbackMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of one phase detector over one track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseOutcome {
    /// The composite score selected this frame.
    Detected {
        /// Selected frame index in the analyzed track.
        frame_index: usize,
    },
    /// A degraded heuristic selected this frame.
    Fallback {
        /// Selected frame index in the analyzed track.
        frame_index: usize,
        /// Which heuristic chose it.
        method: FallbackMethod,
    },
    /// No frame qualified; the phase is treated as missing downstream.
    NotFound,
}

impl PhaseOutcome {
    /// The selected frame index, if any frame was selected.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            PhaseOutcome::Detected { frame_index } => Some(*frame_index),
            PhaseOutcome::Fallback { frame_index, .. } => Some(*frame_index),
            PhaseOutcome::NotFound => None,
        }
    }

    /// True if any frame was selected, via either path.
    pub fn is_found(&self) -> bool {
        !matches!(self, PhaseOutcome::NotFound)
    }

    /// True if the frame came from a degraded heuristic.
    pub fn is_fallback(&self) -> bool {
        matches!(self, PhaseOutcome::Fallback { .. })
    }
}
