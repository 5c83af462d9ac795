//! Per-video pose sequences.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::landmark::Pose;
use crate::stroke::Handedness;

/// The pose sequence extracted from one video: one entry per sampled frame,
/// `None` where inference found no usable pose, plus the effective frame
/// rate of the sequence.
///
/// Detectors index this track by frame position; fallback windows and
/// angular velocities are derived from `fps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseTrack {
    /// Per-frame poses in temporal order.
    pub frames: Vec<Option<Pose>>,
    /// Frames per second of the sampled sequence.
    pub fps: f64,
}

impl PoseTrack {
    /// Create a track from per-frame poses.
    pub fn new(frames: Vec<Option<Pose>>, fps: f64) -> Self {
        Self { frames, fps }
    }

    /// Create an empty track.
    pub fn empty(fps: f64) -> Self {
        Self { frames: Vec::new(), fps }
    }

    /// Number of frames (valid or not).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if the track has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Append one frame's result.
    pub fn push(&mut self, pose: Option<Pose>) {
        self.frames.push(pose);
    }

    /// The pose at `index`, if the frame exists and has a complete pose.
    pub fn pose(&self, index: usize) -> Option<&Pose> {
        self.frames
            .get(index)
            .and_then(|p| p.as_ref())
            .filter(|p| p.is_complete())
    }

    /// Indices of frames carrying a complete pose, in order.
    pub fn valid_indices(&self) -> Vec<usize> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, p)| p.as_ref().is_some_and(|p| p.is_complete()))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of frames carrying a complete pose.
    pub fn valid_count(&self) -> usize {
        self.frames
            .iter()
            .filter(|p| p.as_ref().is_some_and(|p| p.is_complete()))
            .count()
    }

    /// Timestamp of a frame index in seconds.
    pub fn timestamp(&self, index: usize) -> f64 {
        if self.fps > 0.0 {
            index as f64 / self.fps
        } else {
            0.0
        }
    }

    /// Canonicalize for handedness: right-handed tracks are returned
    /// unchanged; left-handed tracks are mirrored frame by frame so
    /// detectors can always read the dominant arm from right-side indices.
    pub fn canonicalized(&self, handedness: Handedness) -> Self {
        match handedness {
            Handedness::Right => self.clone(),
            Handedness::Left => Self {
                frames: self
                    .frames
                    .iter()
                    .map(|p| p.as_ref().map(Pose::mirrored))
                    .collect(),
                fps: self.fps,
            },
        }
    }

    /// A sub-track covering `start..=end` (clamped to the frame range).
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.frames.len().saturating_sub(1));
        if start > end || self.frames.is_empty() {
            return Self::empty(self.fps);
        }
        Self {
            frames: self.frames[start..=end].to_vec(),
            fps: self.fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{indices, Landmark, POSE_LANDMARK_COUNT};

    fn complete_pose(x: f64) -> Pose {
        let mut landmarks = vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT];
        landmarks[indices::RIGHT_WRIST] = Landmark::at(x, 0.5);
        Pose::new(landmarks)
    }

    #[test]
    fn test_valid_indices_skip_missing_and_partial() {
        let track = PoseTrack::new(
            vec![
                Some(complete_pose(0.1)),
                None,
                Some(Pose::new(vec![Landmark::at(0.0, 0.0); 10])),
                Some(complete_pose(0.4)),
            ],
            30.0,
        );

        assert_eq!(track.valid_indices(), vec![0, 3]);
        assert_eq!(track.valid_count(), 2);
        assert!(track.pose(1).is_none());
        assert!(track.pose(2).is_none(), "partial pose must not index");
    }

    #[test]
    fn test_timestamp() {
        let track = PoseTrack::new(vec![None; 61], 30.0);
        assert!((track.timestamp(60) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_canonicalized_right_is_identity() {
        let track = PoseTrack::new(vec![Some(complete_pose(0.8))], 30.0);
        let canon = track.canonicalized(Handedness::Right);
        assert_eq!(track, canon);
    }

    #[test]
    fn test_canonicalized_left_mirrors_wrist() {
        let track = PoseTrack::new(vec![Some(complete_pose(0.8))], 30.0);
        let canon = track.canonicalized(Handedness::Left);
        let pose = canon.pose(0).expect("pose survives mirroring");
        // The dominant wrist now reads from the right-wrist index, reflected.
        let wrist = pose.landmark(indices::RIGHT_WRIST).unwrap();
        assert!((wrist.x - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_slice_clamps_bounds() {
        let track = PoseTrack::new(vec![None, Some(complete_pose(0.2)), None], 30.0);
        let sliced = track.slice(1, 10);
        assert_eq!(sliced.len(), 2);
        assert!(sliced.pose(0).is_some());

        let empty = track.slice(5, 2);
        assert!(empty.is_empty());
    }
}
