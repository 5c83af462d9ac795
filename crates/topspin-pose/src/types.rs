//! Pose service request/response types.

use serde::{Deserialize, Serialize};
use topspin_models::Landmark;

/// Detection mode requested from the pose service.
///
/// `Fast` uses the lighter model with a higher confidence threshold;
/// `Accurate` uses the heavy model with a relaxed threshold and is the
/// second attempt for frames the fast pass misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    Fast,
    Accurate,
}

impl DetectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::Fast => "fast",
            DetectionMode::Accurate => "accurate",
        }
    }
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request for single-image pose detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectRequest {
    /// Base64-encoded JPEG bytes
    pub image: String,
    /// Detection mode
    pub mode: DetectionMode,
}

/// Response from pose detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    /// Detected landmarks, or `None` when no person was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<Landmark>>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&DetectionMode::Fast).unwrap(), "\"fast\"");
        assert_eq!(
            serde_json::to_string(&DetectionMode::Accurate).unwrap(),
            "\"accurate\""
        );
    }

    #[test]
    fn test_detect_response_absent_landmarks() {
        let response: DetectResponse = serde_json::from_str("{}").unwrap();
        assert!(response.landmarks.is_none());

        let response: DetectResponse = serde_json::from_str(r#"{"landmarks": null}"#).unwrap();
        assert!(response.landmarks.is_none());
    }

    #[test]
    fn test_detect_response_with_landmarks() {
        let json = r#"{"landmarks": [{"x": 0.5, "y": 0.5, "z": 0.0, "visibility": 0.9}]}"#;
        let response: DetectResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.landmarks.unwrap().len(), 1);
    }
}
