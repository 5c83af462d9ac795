//! Stroke taxonomy: stroke types, phases, handedness.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The stroke being analyzed.
///
/// Detector targets, tolerances and search windows are parameterized per
/// stroke type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrokeType {
    /// Ground stroke on the dominant side.
    #[default]
    Forehand,
    /// Ground stroke across the body.
    Backhand,
    /// Overhead serve.
    Serve,
}

impl StrokeType {
    /// All supported stroke types.
    pub const ALL: &'static [StrokeType] =
        &[StrokeType::Forehand, StrokeType::Backhand, StrokeType::Serve];

    /// Returns the stroke name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeType::Forehand => "forehand",
            StrokeType::Backhand => "backhand",
            StrokeType::Serve => "serve",
        }
    }

    /// True for forehand/backhand, false for serve.
    pub fn is_ground_stroke(&self) -> bool {
        !matches!(self, StrokeType::Serve)
    }
}

impl fmt::Display for StrokeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrokeType {
    type Err = StrokeTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forehand" => Ok(StrokeType::Forehand),
            "backhand" => Ok(StrokeType::Backhand),
            "serve" => Ok(StrokeType::Serve),
            _ => Err(StrokeTypeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown stroke type: {0}")]
pub struct StrokeTypeParseError(String);

/// One of the three biomechanical moments of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Take-back: racket set behind the body, shoulders rotated.
    Preparation,
    /// Ball contact: the deceleration spike of the swing.
    Impact,
    /// Swing completion: arm extended through the target position.
    FollowThrough,
}

impl PhaseKind {
    /// All phases in temporal order.
    pub const ALL: &'static [PhaseKind] = &[
        PhaseKind::Preparation,
        PhaseKind::Impact,
        PhaseKind::FollowThrough,
    ];

    /// Returns the phase name as a string (also the corpus file stem).
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Preparation => "preparation",
            PhaseKind::Impact => "impact",
            PhaseKind::FollowThrough => "follow_through",
        }
    }

    /// Capitalized label used in feedback text.
    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Preparation => "Preparation",
            PhaseKind::Impact => "Impact",
            PhaseKind::FollowThrough => "Follow-through",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PhaseKind {
    type Err = PhaseKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preparation" => Ok(PhaseKind::Preparation),
            "impact" => Ok(PhaseKind::Impact),
            "follow_through" | "follow-through" => Ok(PhaseKind::FollowThrough),
            _ => Err(PhaseKindParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown stroke phase: {0}")]
pub struct PhaseKindParseError(String);

/// Which hand the player swings with. Declared on the analysis request.
///
/// Left-handed tracks are mirrored before detection so the dominant arm is
/// always read from the right-side landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// Returns the handedness as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Right => "right",
            Handedness::Left => "left",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Handedness {
    type Err = HandednessParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "right" | "r" => Ok(Handedness::Right),
            "left" | "l" => Ok(Handedness::Left),
            _ => Err(HandednessParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown handedness: {0}")]
pub struct HandednessParseError(String);
