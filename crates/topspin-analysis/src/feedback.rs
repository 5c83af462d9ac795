//! User-facing feedback text assembly.
//!
//! Turns a match (or its absence) into the feedback block shown to the
//! player: one line per phase with a similarity tier marker, plus flagged
//! elbow deviations appended to the phase they belong to.

use topspin_models::{
    ComparisonResult, DistanceTier, JointDeviation, PhaseComparison, PhaseKind, StrokeSample,
};

use crate::matcher::StrokeMatch;

/// Feedback when no corpus entry qualified for comparison.
pub const NO_REFERENCE_FEEDBACK: &str = "No reference videos found for comparison.";

/// Feedback when the user's impact frame could not be detected, which makes
/// every comparison invalid. Worth its own message because it is the one
/// missing phase the player can usually fix by re-recording.
pub const IMPACT_MISSING_FEEDBACK: &str = "Impact: ⚠️ Could not detect your impact frame. \
     Please try uploading a different video with clearer contact point.";

/// One phase's feedback line.
pub fn phase_feedback_line(comparison: &PhaseComparison) -> String {
    let label = comparison.phase.label();
    let mut line = match comparison.tier {
        DistanceTier::Excellent => {
            format!("{label}: 🟢 Excellent similarity (DTW={:.1}).", comparison.distance)
        }
        DistanceTier::Moderate => {
            format!("{label}: 🟡 Moderate difference (DTW={:.1}).", comparison.distance)
        }
        DistanceTier::High => {
            format!("{label}: 🔴 High difference (DTW={:.1}).", comparison.distance)
        }
    };

    for deviation in &comparison.deviations {
        line.push(' ');
        line.push_str(&deviation_line(deviation));
    }
    line
}

fn deviation_line(deviation: &JointDeviation) -> String {
    format!(
        "{} elbow angle differs by {:.1}°.",
        deviation.side.label(),
        deviation.delta_degrees
    )
}

/// The full feedback block for one analysis.
///
/// With a match, one line per compared phase. Without one, a line per phase
/// missing from the user's sample (in temporal order), or the no-reference
/// sentinel when the sample is complete and the corpus simply had nothing.
pub fn comparison_feedback(user: &StrokeSample, matched: Option<&StrokeMatch>) -> String {
    match matched {
        Some(matched) => matched
            .phases
            .iter()
            .map(phase_feedback_line)
            .collect::<Vec<_>>()
            .join("\n"),
        None => {
            let missing: Vec<String> = PhaseKind::ALL
                .iter()
                .filter(|kind| user.phase(**kind).is_none())
                .map(|kind| match kind {
                    PhaseKind::Impact => IMPACT_MISSING_FEEDBACK.to_string(),
                    _ => format!("{}: Data missing (user).", kind.label()),
                })
                .collect();
            if missing.is_empty() {
                NO_REFERENCE_FEEDBACK.to_string()
            } else {
                missing.join("\n")
            }
        }
    }
}

/// Assemble the comparison result from the match outcome and the matched
/// entry's clip path.
pub fn build_comparison_result(
    user: &StrokeSample,
    matched: Option<StrokeMatch>,
    reference_clip: Option<String>,
) -> ComparisonResult {
    match matched {
        Some(matched) => {
            let feedback = comparison_feedback(user, Some(&matched));
            ComparisonResult {
                matched_reference_id: Some(matched.reference_id.to_string()),
                reference_clip,
                total_distance: Some(matched.total_distance),
                phases: matched.phases,
                feedback,
            }
        }
        None => ComparisonResult::no_reference(comparison_feedback(user, None)),
    }
}
