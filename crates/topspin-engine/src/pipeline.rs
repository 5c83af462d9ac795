//! The analysis pipeline.
//!
//! Orchestrates one request end to end: probe the video, sample frames,
//! extract poses, canonicalize for handedness, optionally trim to a single
//! stroke, detect phases, compare against the reference corpus, and
//! assemble the report. Each stage advances the session record; the whole
//! run executes under the configured deadline and on expiry the session is
//! failed with no partial report.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use topspin_analysis::{build_comparison_result, find_best_match, locate_stroke, PhaseDetector};
use topspin_corpus::CorpusStore;
use topspin_media::{probe_video, sample_frames, SampledFrame, VideoInfo};
use topspin_models::{
    AnalysisReport, AnalysisRequest, AnalysisState, PhaseKind, PhaseReport, Pose, PoseTrack,
    VideoSummary,
};
use topspin_pose::PoseSource;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::logging::AnalysisLogger;
use crate::metrics::{
    record_analysis_completed, record_analysis_failed, record_comparison, record_frames_analyzed,
    record_phase_outcome, record_stage_duration,
};
use crate::session::SessionStore;

/// One analysis engine: configuration, pose source, corpus, and sessions.
pub struct AnalysisEngine {
    config: EngineConfig,
    pose: Arc<dyn PoseSource>,
    corpus: CorpusStore,
    sessions: SessionStore,
}

impl AnalysisEngine {
    /// Create an engine over a pose source.
    pub fn new(config: EngineConfig, pose: Arc<dyn PoseSource>) -> Self {
        let corpus = CorpusStore::new(&config.corpus_root);
        Self {
            config,
            pose,
            corpus,
            sessions: SessionStore::new(),
        }
    }

    /// The engine's session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one analysis to completion or failure.
    pub async fn analyze(&self, request: AnalysisRequest) -> EngineResult<AnalysisReport> {
        self.sessions.insert(&request).await;
        let logger = AnalysisLogger::new(&request.id, request.stroke_type);
        let deadline = self.config.analysis_timeout;

        match tokio::time::timeout(deadline, self.run(&request, &logger)).await {
            Ok(Ok(report)) => {
                self.sessions
                    .advance(&request.id, AnalysisState::Completed)
                    .await;
                record_analysis_completed(request.stroke_type, report.elapsed_ms as f64 / 1000.0);
                logger.log_completion(&format!(
                    "{} of 3 phases found in {} ms",
                    report.detected_phase_count(),
                    report.elapsed_ms
                ));
                Ok(report)
            }
            Ok(Err(err)) => {
                logger.log_error(&err.to_string());
                record_analysis_failed(request.stroke_type, err.category());
                self.sessions.fail(&request.id, err.to_string()).await;
                cleanup_scratch(&self.config.work_dir.join(request.id.as_str()));
                Err(err)
            }
            Err(_elapsed) => {
                let err = EngineError::Timeout(deadline.as_secs());
                logger.log_error(&err.to_string());
                record_analysis_failed(request.stroke_type, err.category());
                self.sessions.fail(&request.id, err.to_string()).await;
                cleanup_scratch(&self.config.work_dir.join(request.id.as_str()));
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        request: &AnalysisRequest,
        logger: &AnalysisLogger,
    ) -> EngineResult<AnalysisReport> {
        let started = Instant::now();
        logger.log_start(&format!("Analyzing {}", request.video_path.display()));

        self.sessions
            .advance(&request.id, AnalysisState::Probing)
            .await;
        let stage = Instant::now();
        let info = probe_video(&request.video_path).await?;
        record_stage_duration("probe", stage.elapsed().as_secs_f64());

        let sample_fps = effective_sample_fps(self.config.sample_fps, &info);
        let frames_dir = self.config.work_dir.join(request.id.as_str());

        let stage = Instant::now();
        let frames = sample_frames(&request.video_path, &frames_dir, sample_fps, None).await?;
        record_stage_duration("sample", stage.elapsed().as_secs_f64());
        logger.log_stage(
            "sample",
            &format!("{} frames at {:.1} fps", frames.len(), sample_fps),
        );

        self.sessions
            .advance(&request.id, AnalysisState::ExtractingPoses)
            .await;
        let stage = Instant::now();
        let extraction = self.extract_poses(&frames).await;
        cleanup_scratch(&frames_dir);
        let poses = extraction?;
        record_stage_duration("pose", stage.elapsed().as_secs_f64());

        let track = PoseTrack::new(poses, sample_fps).canonicalized(request.handedness);
        record_frames_analyzed(track.len(), track.len() - track.valid_count());
        logger.log_stage(
            "pose",
            &format!("{}/{} frames with a pose", track.valid_count(), track.len()),
        );

        let (track, trim_offset) = if request.trim_rally {
            match locate_stroke(&track) {
                Some(bounds) => {
                    logger.log_stage(
                        "trim",
                        &format!("Trimmed to frames {}..={}", bounds.start, bounds.end),
                    );
                    (track.slice(bounds.start, bounds.end), bounds.start)
                }
                None => {
                    logger.log_warning("No stroke boundaries found, analyzing the full track");
                    (track, 0)
                }
            }
        } else {
            (track, 0)
        };

        self.sessions
            .advance(&request.id, AnalysisState::DetectingPhases)
            .await;
        let stage = Instant::now();
        let detector = PhaseDetector::new(request.stroke_type);
        let detected = detector.detect_all(&track);
        let sample = detector.sample_from(&track, &detected);
        record_stage_duration("detect", stage.elapsed().as_secs_f64());

        let phases: Vec<PhaseReport> = PhaseKind::ALL
            .iter()
            .map(|&kind| {
                let outcome = detected.outcome(kind);
                record_phase_outcome(kind, &outcome);
                PhaseReport {
                    phase: kind,
                    outcome,
                    timestamp_secs: outcome
                        .frame_index()
                        .map(|index| track.timestamp(index + trim_offset)),
                }
            })
            .collect();

        self.sessions
            .advance(&request.id, AnalysisState::Comparing)
            .await;
        let stage = Instant::now();
        let entries = self.corpus.load_entries(request.stroke_type).await;
        let matched = find_best_match(&sample, &entries);
        record_comparison(request.stroke_type, matched.is_some());

        let reference_clip = match &matched {
            Some(found) => self.corpus.manifest().await.and_then(|manifest| {
                manifest
                    .clip_for_reference(&found.reference_id, request.stroke_type)
                    .map(str::to_string)
            }),
            None => None,
        };
        let comparison = build_comparison_result(&sample, matched, reference_clip);
        record_stage_duration("compare", stage.elapsed().as_secs_f64());

        Ok(AnalysisReport {
            analysis_id: request.id.clone(),
            stroke_type: request.stroke_type,
            handedness: request.handedness,
            video: VideoSummary {
                duration_secs: info.duration_secs,
                fps: sample_fps,
                frames_analyzed: track.len(),
                frames_with_pose: track.valid_count(),
            },
            phases,
            comparison,
            elapsed_ms: started.elapsed().as_millis() as u64,
            created_at: chrono::Utc::now(),
        })
    }

    /// Run pose detection over sampled frames with bounded concurrency.
    ///
    /// Results keep frame order. A frame with no detectable person is
    /// recorded as `None`; transport failures abort the extraction.
    async fn extract_poses(&self, frames: &[SampledFrame]) -> EngineResult<Vec<Option<Pose>>> {
        let concurrency = self.config.pose_parallelism.max(1);

        let results: Vec<EngineResult<Option<Pose>>> = stream::iter(frames.iter().map(|frame| {
            let pose = Arc::clone(&self.pose);
            async move {
                let jpeg = frame.read().await?;
                let detected = pose.detect_with_fallback(&jpeg).await?;
                if detected.is_none() {
                    debug!(frame = frame.index, "No pose detected");
                }
                Ok(detected)
            }
        }))
        .buffered(concurrency)
        .collect()
        .await;

        results.into_iter().collect()
    }
}

/// Cap the configured sampling rate at the source frame rate so
/// slow-motion clips are not upsampled with duplicate frames.
fn effective_sample_fps(configured: f64, info: &VideoInfo) -> f64 {
    if info.fps > 0.0 && info.fps < configured {
        info.fps
    } else {
        configured
    }
}

/// Best-effort removal of a per-analysis scratch directory.
fn cleanup_scratch(dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove scratch dir {}: {}", dir.display(), e);
        }
    }
}
