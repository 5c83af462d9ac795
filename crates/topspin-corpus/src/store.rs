//! Tolerant reads and atomic writes over the corpus tree.
//!
//! Reads never fail the caller: an absent or unreadable record is an
//! absent phase, and an unreadable root or a stale format version is an
//! empty corpus. Writes go
//! through a temp file and rename, so a concurrent reader sees either the
//! old record or the new one, never a torn file.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use topspin_models::{PhaseKind, Pose, ReferenceEntry, ReferenceId, StrokeSample, StrokeType};

use crate::error::{CorpusError, CorpusResult};
use crate::layout::{self, KEYPOINT_FORMAT_VERSION};
use crate::manifest::CorpusManifest;

/// Handle on one corpus root directory.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    root: PathBuf,
}

impl CorpusStore {
    /// Store over an existing (or future) corpus root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The corpus root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the corpus manifest, if one is present and readable.
    pub async fn manifest(&self) -> Option<CorpusManifest> {
        CorpusManifest::load(&self.root).await
    }

    /// Write the corpus manifest atomically.
    pub async fn save_manifest(&self, manifest: &CorpusManifest) -> CorpusResult<()> {
        manifest.save(&self.root).await
    }

    /// Load one entry's sample for a stroke type. Phases whose records are
    /// missing, unreadable or partial come back absent.
    pub async fn load_sample(&self, player_id: &str, stroke_type: StrokeType) -> StrokeSample {
        let mut sample = StrokeSample::new();
        for phase in PhaseKind::ALL {
            if let Some(pose) = self.load_phase(player_id, stroke_type, *phase).await {
                sample.set_phase(*phase, pose);
            }
        }
        sample
    }

    /// Load every entry for a stroke type, in lexicographic id order.
    pub async fn load_entries(&self, stroke_type: StrokeType) -> Vec<ReferenceEntry> {
        if let Some(manifest) = self.manifest().await {
            if !manifest.is_current() {
                warn!(
                    version = manifest.version,
                    expected = KEYPOINT_FORMAT_VERSION,
                    "Corpus format version mismatch, treating corpus as empty"
                );
                return Vec::new();
            }
        }

        let mut player_ids = match self.list_players().await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(
                    root = %self.root.display(),
                    error = %err,
                    "Corpus root unreadable, treating corpus as empty"
                );
                return Vec::new();
            }
        };
        player_ids.sort();

        let mut entries = Vec::new();
        for player_id in player_ids {
            if !layout::stroke_dir(&self.root, &player_id, stroke_type).is_dir() {
                continue;
            }
            let sample = self.load_sample(&player_id, stroke_type).await;
            if sample.present_phases().is_empty() {
                debug!(
                    player = %player_id,
                    stroke = %stroke_type,
                    "No readable phase records for entry"
                );
                continue;
            }
            entries.push(ReferenceEntry::new(ReferenceId::new(player_id), sample));
        }

        debug!(
            stroke = %stroke_type,
            entries = entries.len(),
            "Loaded corpus entries"
        );
        entries
    }

    /// Replace one entry's stored sample for a stroke type.
    ///
    /// Present phases are written through a temp file and rename; phases
    /// absent from `sample` have their records removed, so the stored
    /// state always equals the given sample afterwards.
    pub async fn replace_sample(
        &self,
        player_id: &str,
        stroke_type: StrokeType,
        sample: &StrokeSample,
    ) -> CorpusResult<()> {
        let dir = layout::stroke_dir(&self.root, player_id, stroke_type);
        fs::create_dir_all(&dir).await?;

        for phase in PhaseKind::ALL {
            let path = layout::phase_record_path(&self.root, player_id, stroke_type, *phase);
            match sample.phase(*phase) {
                Some(pose) => write_record(&path, pose).await?,
                None => remove_if_present(&path).await?,
            }
        }

        debug!(player = %player_id, stroke = %stroke_type, "Replaced corpus sample");
        Ok(())
    }

    async fn load_phase(
        &self,
        player_id: &str,
        stroke_type: StrokeType,
        phase: PhaseKind,
    ) -> Option<Pose> {
        let path = layout::phase_record_path(&self.root, player_id, stroke_type, phase);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return None;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read phase record");
                return None;
            }
        };

        let pose: Pose = match serde_json::from_slice(&bytes) {
            Ok(pose) => pose,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Corrupt phase record, treating as absent");
                return None;
            }
        };

        if !pose.is_complete() {
            warn!(
                path = %path.display(),
                landmarks = pose.len(),
                "Partial phase record, treating as absent"
            );
            return None;
        }
        Some(pose)
    }

    async fn list_players(&self) -> io::Result<Vec<String>> {
        let mut dir = fs::read_dir(&self.root).await?;
        let mut ids = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                ids.push(name.to_string());
            }
        }
        Ok(ids)
    }
}

async fn write_record(path: &Path, pose: &Pose) -> CorpusResult<()> {
    let bytes = serde_json::to_vec(pose)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes).await?;
    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = std::fs::remove_file(&tmp);
        return Err(CorpusError::write_failed(
            path.display().to_string(),
            err.to_string(),
        ));
    }
    Ok(())
}

async fn remove_if_present(path: &Path) -> CorpusResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use topspin_models::{indices, Landmark, POSE_LANDMARK_COUNT};

    fn complete_pose(x: f64) -> Pose {
        let mut landmarks = vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT];
        landmarks[indices::RIGHT_WRIST] = Landmark::at(x, 0.4);
        Pose::new(landmarks)
    }

    fn complete_sample(x: f64) -> StrokeSample {
        StrokeSample::new()
            .with_phase(PhaseKind::Preparation, complete_pose(x))
            .with_phase(PhaseKind::Impact, complete_pose(x + 0.1))
            .with_phase(PhaseKind::FollowThrough, complete_pose(x + 0.2))
    }

    #[tokio::test]
    async fn test_replace_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path());
        let sample = complete_sample(0.6);

        store
            .replace_sample("roger_federer", StrokeType::Forehand, &sample)
            .await
            .expect("replace");

        let loaded = store.load_sample("roger_federer", StrokeType::Forehand).await;
        assert_eq!(loaded, sample);
    }

    #[tokio::test]
    async fn test_missing_phase_record_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path());

        let mut sample = complete_sample(0.6);
        sample.follow_through = None;
        store
            .replace_sample("roger_federer", StrokeType::Backhand, &sample)
            .await
            .expect("replace");

        let loaded = store.load_sample("roger_federer", StrokeType::Backhand).await;
        assert!(loaded.preparation.is_some());
        assert!(loaded.impact.is_some());
        assert!(loaded.follow_through.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path());
        store
            .replace_sample("roger_federer", StrokeType::Forehand, &complete_sample(0.6))
            .await
            .expect("replace");

        let impact_path = layout::phase_record_path(
            dir.path(),
            "roger_federer",
            StrokeType::Forehand,
            PhaseKind::Impact,
        );
        fs::write(&impact_path, b"{ not json").await.unwrap();

        let loaded = store.load_sample("roger_federer", StrokeType::Forehand).await;
        assert!(loaded.impact.is_none());
        assert!(loaded.preparation.is_some());
    }

    #[tokio::test]
    async fn test_partial_record_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path());
        let path = layout::phase_record_path(
            dir.path(),
            "roger_federer",
            StrokeType::Forehand,
            PhaseKind::Preparation,
        );
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();

        let short_pose = Pose::new(vec![Landmark::at(0.5, 0.5); 5]);
        fs::write(&path, serde_json::to_vec(&short_pose).unwrap())
            .await
            .unwrap();

        let loaded = store.load_sample("roger_federer", StrokeType::Forehand).await;
        assert!(loaded.preparation.is_none());
    }

    #[tokio::test]
    async fn test_entries_sorted_and_filtered_by_stroke() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path());

        store
            .replace_sample("serena_williams", StrokeType::Forehand, &complete_sample(0.5))
            .await
            .unwrap();
        store
            .replace_sample("rafael_nadal", StrokeType::Forehand, &complete_sample(0.6))
            .await
            .unwrap();
        // Serve-only entry must not appear for forehand.
        store
            .replace_sample("nick_kyrgios", StrokeType::Serve, &complete_sample(0.7))
            .await
            .unwrap();

        let entries = store.load_entries(StrokeType::Forehand).await;
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["rafael_nadal", "serena_williams"]);
    }

    #[tokio::test]
    async fn test_missing_root_is_empty_corpus() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path().join("nonexistent"));
        assert!(store.load_entries(StrokeType::Forehand).await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_format_version_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path());
        store
            .replace_sample("roger_federer", StrokeType::Forehand, &complete_sample(0.6))
            .await
            .unwrap();

        store.save_manifest(&CorpusManifest::new()).await.unwrap();
        assert_eq!(store.load_entries(StrokeType::Forehand).await.len(), 1);

        let stale = CorpusManifest {
            version: KEYPOINT_FORMAT_VERSION + 1,
            ..CorpusManifest::new()
        };
        store.save_manifest(&stale).await.unwrap();
        assert!(store.load_entries(StrokeType::Forehand).await.is_empty());
    }

    #[tokio::test]
    async fn test_replace_removes_stale_phases() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path());
        store
            .replace_sample("roger_federer", StrokeType::Forehand, &complete_sample(0.6))
            .await
            .unwrap();

        let prep_only =
            StrokeSample::new().with_phase(PhaseKind::Preparation, complete_pose(0.9));
        store
            .replace_sample("roger_federer", StrokeType::Forehand, &prep_only)
            .await
            .unwrap();

        let loaded = store.load_sample("roger_federer", StrokeType::Forehand).await;
        assert_eq!(loaded, prep_only);
        let impact_path = layout::phase_record_path(
            dir.path(),
            "roger_federer",
            StrokeType::Forehand,
            PhaseKind::Impact,
        );
        assert!(!impact_path.exists());
    }
}
