//! Best-match search over the reference corpus.
//!
//! Every qualifying corpus entry is scored independently (the comparisons
//! are read-only and embarrassingly parallel, so they run on the Rayon
//! pool) and the entry with the minimum summed phase distance wins.
//! Candidates are ranked in lexicographic id order, so ties resolve to the
//! first id deterministically.

use rayon::prelude::*;
use tracing::{debug, warn};

use topspin_models::{PhaseComparison, PhaseKind, ReferenceEntry, ReferenceId, StrokeSample};

use crate::align::compare_phase;
use crate::normalize::{normalize_pose, NormalizedPose};

/// The winning corpus entry and its per-phase breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeMatch {
    /// Identifier of the matched entry.
    pub reference_id: ReferenceId,
    /// Sum of the three per-phase alignment distances.
    pub total_distance: f64,
    /// Per-phase comparisons, in temporal phase order.
    pub phases: Vec<PhaseComparison>,
}

/// Find the corpus entry closest to the user's stroke.
///
/// Only complete samples compare: if the user sample or a candidate entry
/// is missing any phase, that comparison is invalid and never scored, even
/// if its partial distance would be lowest. Returns `None` when no entry
/// qualifies.
pub fn find_best_match(user: &StrokeSample, entries: &[ReferenceEntry]) -> Option<StrokeMatch> {
    if !user.is_complete() {
        debug!(
            present = ?user.present_phases(),
            "User sample incomplete, skipping reference comparison"
        );
        return None;
    }

    let user_normalized = [
        normalize_phase(user, PhaseKind::Preparation)?,
        normalize_phase(user, PhaseKind::Impact)?,
        normalize_phase(user, PhaseKind::FollowThrough)?,
    ];

    let mut ordered: Vec<&ReferenceEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    // Score candidates in parallel; order is preserved by collect.
    let scored: Vec<Option<StrokeMatch>> = ordered
        .into_par_iter()
        .map(|entry| score_entry(&user_normalized, entry))
        .collect();

    let mut best: Option<StrokeMatch> = None;
    for candidate in scored.into_iter().flatten() {
        let replace = match &best {
            Some(current) => candidate.total_distance < current.total_distance,
            None => true,
        };
        if replace {
            best = Some(candidate);
        }
    }
    best
}

/// Normalize one phase of a sample, or `None` when the phase is absent or
/// its pose cannot be normalized.
fn normalize_phase(sample: &StrokeSample, kind: PhaseKind) -> Option<NormalizedPose> {
    let pose = sample.phase(kind)?;
    match normalize_pose(pose) {
        Ok(normalized) => Some(normalized),
        Err(err) => {
            warn!(phase = %kind, error = %err, "Skipping phase with unnormalizable pose");
            None
        }
    }
}

fn score_entry(user: &[NormalizedPose; 3], entry: &ReferenceEntry) -> Option<StrokeMatch> {
    if !entry.sample.is_complete() {
        debug!(
            reference = %entry.id,
            present = ?entry.sample.present_phases(),
            "Excluding incomplete reference entry"
        );
        return None;
    }

    let mut phases = Vec::with_capacity(PhaseKind::ALL.len());
    let mut total_distance = 0.0;
    for (kind, user_pose) in PhaseKind::ALL.iter().zip(user) {
        let reference_pose = normalize_phase(&entry.sample, *kind)?;
        let comparison = compare_phase(*kind, user_pose, &reference_pose);
        total_distance += comparison.distance;
        phases.push(comparison);
    }

    Some(StrokeMatch {
        reference_id: entry.id.clone(),
        total_distance,
        phases,
    })
}
