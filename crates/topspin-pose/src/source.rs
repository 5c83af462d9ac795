//! Pose detection abstraction.

use async_trait::async_trait;
use topspin_models::Pose;

use crate::error::PoseResult;
use crate::types::DetectionMode;

/// Source of pose landmarks for single frames.
///
/// The pipeline depends on this trait rather than the HTTP client so tests
/// can substitute canned landmark sets.
#[async_trait]
pub trait PoseSource: Send + Sync {
    /// Detect a pose in one JPEG-encoded frame.
    ///
    /// Returns `Ok(None)` when no person is detected; errors are reserved
    /// for transport and protocol failures.
    async fn detect(&self, jpeg: &[u8], mode: DetectionMode) -> PoseResult<Option<Pose>>;

    /// Two-attempt detection: a fast pass first, then the accurate model
    /// for frames the fast pass misses.
    async fn detect_with_fallback(&self, jpeg: &[u8]) -> PoseResult<Option<Pose>> {
        if let Some(pose) = self.detect(jpeg, DetectionMode::Fast).await? {
            return Ok(Some(pose));
        }
        self.detect(jpeg, DetectionMode::Accurate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use topspin_models::{Landmark, POSE_LANDMARK_COUNT};

    struct FlakySource {
        calls: Mutex<Vec<DetectionMode>>,
        fast_finds: bool,
    }

    fn full_pose() -> Pose {
        Pose(vec![Landmark::new(0.5, 0.5, 0.0, 0.9); POSE_LANDMARK_COUNT])
    }

    #[async_trait]
    impl PoseSource for FlakySource {
        async fn detect(&self, _jpeg: &[u8], mode: DetectionMode) -> PoseResult<Option<Pose>> {
            self.calls.lock().unwrap().push(mode);
            match mode {
                DetectionMode::Fast if self.fast_finds => Ok(Some(full_pose())),
                DetectionMode::Fast => Ok(None),
                DetectionMode::Accurate => Ok(Some(full_pose())),
            }
        }
    }

    #[tokio::test]
    async fn test_fallback_skips_accurate_on_fast_hit() {
        let source = FlakySource {
            calls: Mutex::new(Vec::new()),
            fast_finds: true,
        };
        let pose = source.detect_with_fallback(b"jpeg").await.unwrap();
        assert!(pose.is_some());
        assert_eq!(source.calls.lock().unwrap().as_slice(), &[DetectionMode::Fast]);
    }

    #[tokio::test]
    async fn test_fallback_retries_with_accurate() {
        let source = FlakySource {
            calls: Mutex::new(Vec::new()),
            fast_finds: false,
        };
        let pose = source.detect_with_fallback(b"jpeg").await.unwrap();
        assert!(pose.is_some());
        assert_eq!(
            source.calls.lock().unwrap().as_slice(),
            &[DetectionMode::Fast, DetectionMode::Accurate]
        );
    }
}
