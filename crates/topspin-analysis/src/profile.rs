//! Per-stroke detection profiles.
//!
//! Every tunable the three phase detectors consume lives here, keyed by
//! stroke type. The presets encode the biomechanics of each stroke: a
//! serve winds up earlier and more side-on than a ground stroke, a
//! backhand finishes further in front of the body, and so on.

use topspin_models::StrokeType;

use crate::error::{AnalysisError, AnalysisResult};

/// Weight of the elbow-angle score in the preparation composite; fixed
/// across strokes, with the per-stroke shoulder and height weights added
/// on top. The three weights must sum to at most 1.
pub const PREPARATION_ELBOW_WEIGHT: f64 = 0.5;

/// Tunables for the preparation detector.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparationProfile {
    /// Search window as fractions of the track (start, end), inclusive.
    pub window: (f64, f64),
    /// Ideal elbow angle at take-back.
    pub elbow_target_degrees: f64,
    /// Elbow score falls to zero this many degrees from the target.
    pub elbow_tolerance_degrees: f64,
    /// Ideal shoulder-line tilt (torso rotation proxy).
    pub shoulder_target_degrees: f64,
    /// Tilt score falls to zero this many degrees from the target.
    pub shoulder_tolerance_degrees: f64,
    /// Weight of the shoulder-rotation score in the composite.
    pub shoulder_weight: f64,
    /// Ideal wrist height relative to the dominant shoulder
    /// (image coordinates, negative = above).
    pub wrist_height_target: f64,
    /// Height score falls to zero this far from the target.
    pub wrist_height_tolerance: f64,
    /// Weight of the wrist-height score in the composite.
    pub wrist_height_weight: f64,
    /// Minimum composite score for the best frame to qualify.
    pub min_score: f64,
}

/// Tunables for the impact detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactProfile {
    /// Moving-average window applied to both angle signals.
    pub smoothing_window: usize,
    /// Weight of the forearm acceleration signal when blended with the
    /// elbow signal.
    pub forearm_weight: f64,
    /// Acceleration-peak search region as fractions of the signal.
    pub search_region: (f64, f64),
    /// How far around the mapped peak to look for a frame with a full pose.
    pub scan_radius: i64,
    /// Minimum valid-pose frames for angular-velocity analysis.
    pub min_valid_frames: usize,
}

impl ImpactProfile {
    fn with_forearm_weight(forearm_weight: f64) -> Self {
        Self {
            smoothing_window: 3,
            forearm_weight,
            search_region: (0.25, 0.75),
            scan_radius: 5,
            min_valid_frames: 10,
        }
    }
}

/// Tunables for the follow-through detector.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowThroughProfile {
    /// Expected wrist position relative to the dominant shoulder at the
    /// finish, `(dx, dy)` in image coordinates.
    pub wrist_target: (f64, f64),
    /// Weight of the arm-extension score.
    pub extension_weight: f64,
    /// Weight of the wrist-position score.
    pub position_weight: f64,
    /// Candidates must reach this fraction of the window's best score.
    pub candidate_score_fraction: f64,
    /// Consecutive wrist displacements checked for stabilization.
    pub stability_steps: usize,
    /// Maximum per-step wrist displacement while stabilized.
    pub stability_epsilon: f64,
    /// Fraction of the track where the candidate search begins.
    pub search_start_fraction: f64,
    /// Selection point when nothing scores, as a fraction of the track.
    pub temporal_fallback_fraction: f64,
}

impl FollowThroughProfile {
    fn toward(wrist_target: (f64, f64)) -> Self {
        Self {
            wrist_target,
            extension_weight: 0.6,
            position_weight: 0.4,
            candidate_score_fraction: 0.7,
            stability_steps: 5,
            stability_epsilon: 0.02,
            search_start_fraction: 0.5,
            temporal_fallback_fraction: 0.75,
        }
    }
}

/// All detector tunables for one stroke type.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeProfile {
    pub stroke_type: StrokeType,
    pub preparation: PreparationProfile,
    pub impact: ImpactProfile,
    pub follow_through: FollowThroughProfile,
}

impl StrokeProfile {
    /// The forehand preset.
    pub fn forehand() -> Self {
        Self {
            stroke_type: StrokeType::Forehand,
            preparation: PreparationProfile {
                window: (0.1, 0.6),
                elbow_target_degrees: 110.0,
                elbow_tolerance_degrees: 30.0,
                shoulder_target_degrees: 15.0,
                shoulder_tolerance_degrees: 45.0,
                shoulder_weight: 0.15,
                wrist_height_target: -0.05,
                wrist_height_tolerance: 0.15,
                wrist_height_weight: 0.2,
                min_score: 0.5,
            },
            impact: ImpactProfile::with_forearm_weight(0.6),
            // High finish across the body.
            follow_through: FollowThroughProfile::toward((-0.3, -0.2)),
        }
    }

    /// The backhand preset.
    pub fn backhand() -> Self {
        Self {
            stroke_type: StrokeType::Backhand,
            preparation: PreparationProfile {
                window: (0.1, 0.6),
                // More extended take-back than the forehand.
                elbow_target_degrees: 120.0,
                elbow_tolerance_degrees: 25.0,
                shoulder_target_degrees: 25.0,
                shoulder_tolerance_degrees: 45.0,
                shoulder_weight: 0.2,
                wrist_height_target: 0.0,
                wrist_height_tolerance: 0.12,
                wrist_height_weight: 0.25,
                min_score: 0.5,
            },
            impact: ImpactProfile::with_forearm_weight(0.6),
            // Extended finish in front of the dominant side.
            follow_through: FollowThroughProfile::toward((0.4, -0.1)),
        }
    }

    /// The serve preset.
    pub fn serve() -> Self {
        Self {
            stroke_type: StrokeType::Serve,
            preparation: PreparationProfile {
                // Trophy position comes early in the clip.
                window: (0.05, 0.4),
                elbow_target_degrees: 90.0,
                elbow_tolerance_degrees: 35.0,
                shoulder_target_degrees: 30.0,
                shoulder_tolerance_degrees: 45.0,
                shoulder_weight: 0.25,
                wrist_height_target: -0.2,
                wrist_height_tolerance: 0.2,
                wrist_height_weight: 0.15,
                min_score: 0.4,
            },
            impact: ImpactProfile::with_forearm_weight(0.7),
            // Racket decelerates down past the opposite hip.
            follow_through: FollowThroughProfile::toward((-0.4, 0.3)),
        }
    }

    /// The preset profile for a stroke type.
    pub fn for_stroke(stroke_type: StrokeType) -> Self {
        match stroke_type {
            StrokeType::Forehand => Self::forehand(),
            StrokeType::Backhand => Self::backhand(),
            StrokeType::Serve => Self::serve(),
        }
    }

    /// Check the profile's scoring contract. Composite weights must not
    /// exceed 1 (the score tiers assume a [0, 1] range) and every
    /// proximity tolerance must be positive (it is a divisor).
    pub fn validate(&self) -> AnalysisResult<()> {
        let prep = &self.preparation;
        let prep_weights =
            PREPARATION_ELBOW_WEIGHT + prep.shoulder_weight + prep.wrist_height_weight;
        if prep_weights > 1.0 {
            return Err(AnalysisError::InvalidProfile(format!(
                "preparation weights sum to {prep_weights}, must not exceed 1"
            )));
        }
        if prep.elbow_tolerance_degrees <= 0.0
            || prep.shoulder_tolerance_degrees <= 0.0
            || prep.wrist_height_tolerance <= 0.0
        {
            return Err(AnalysisError::InvalidProfile(
                "preparation tolerances must be positive".to_string(),
            ));
        }

        let follow = &self.follow_through;
        let follow_weights = follow.extension_weight + follow.position_weight;
        if follow_weights > 1.0 {
            return Err(AnalysisError::InvalidProfile(format!(
                "follow-through weights sum to {follow_weights}, must not exceed 1"
            )));
        }

        if !(0.0..=1.0).contains(&self.impact.forearm_weight) {
            return Err(AnalysisError::InvalidProfile(format!(
                "forearm weight {} outside [0, 1]",
                self.impact.forearm_weight
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_cover_all_stroke_types() {
        for &stroke_type in StrokeType::ALL {
            let profile = StrokeProfile::for_stroke(stroke_type);
            assert_eq!(profile.stroke_type, stroke_type);
            assert!(profile.preparation.window.0 < profile.preparation.window.1);
            assert!(profile.preparation.min_score > 0.0);
            assert!(profile.impact.forearm_weight > 0.0 && profile.impact.forearm_weight < 1.0);
        }
    }

    #[test]
    fn test_presets_validate() {
        for &stroke_type in StrokeType::ALL {
            StrokeProfile::for_stroke(stroke_type)
                .validate()
                .expect("preset must satisfy its own contract");
        }
    }

    #[test]
    fn test_validate_rejects_overweight_composite() {
        let mut profile = StrokeProfile::forehand();
        profile.preparation.shoulder_weight = 0.4;
        profile.preparation.wrist_height_weight = 0.4;
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidProfile(_)));
    }

    #[test]
    fn test_validate_rejects_zero_tolerance() {
        let mut profile = StrokeProfile::serve();
        profile.preparation.wrist_height_tolerance = 0.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_serve_searches_earlier_than_ground_strokes() {
        let serve = StrokeProfile::serve();
        let forehand = StrokeProfile::forehand();
        assert!(serve.preparation.window.0 < forehand.preparation.window.0);
        assert!(serve.preparation.window.1 < forehand.preparation.window.1);
        assert!(serve.preparation.min_score < forehand.preparation.min_score);
        assert!(serve.impact.forearm_weight > forehand.impact.forearm_weight);
    }
}
