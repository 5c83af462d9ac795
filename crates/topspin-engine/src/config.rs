//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Tunables for the analysis pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Target frame sampling rate. The effective rate is capped at the
    /// source frame rate so slow-motion clips are not upsampled.
    pub sample_fps: f64,

    /// Maximum concurrent pose service requests.
    pub pose_parallelism: usize,

    /// Whole-analysis deadline. On expiry the session is failed and
    /// partial results are discarded.
    pub analysis_timeout: Duration,

    /// Reference corpus root directory.
    pub corpus_root: PathBuf,

    /// Scratch directory for sampled frames.
    pub work_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_fps: 30.0,
            pose_parallelism: 4,
            analysis_timeout: Duration::from_secs(300),
            corpus_root: PathBuf::from("reference_corpus"),
            work_dir: PathBuf::from("/tmp/topspin"),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            sample_fps: std::env::var("ENGINE_SAMPLE_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30.0),
            pose_parallelism: std::env::var("ENGINE_POSE_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            analysis_timeout: Duration::from_secs(
                std::env::var("ENGINE_ANALYSIS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            corpus_root: std::env::var("ENGINE_CORPUS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("reference_corpus")),
            work_dir: std::env::var("ENGINE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/topspin")),
        }
    }
}
