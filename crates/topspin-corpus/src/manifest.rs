//! Corpus manifest: reference ids to display data and clip assets.
//!
//! The manifest is the explicit reference-id to asset-path mapping; the
//! clip a matched reference links back to is looked up here, never
//! reconstructed from filenames.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use topspin_models::{ReferenceId, StrokeType};

use crate::error::CorpusResult;
use crate::layout::{manifest_path, KEYPOINT_FORMAT_VERSION};

/// One player's manifest data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerManifest {
    /// Human-readable player name for feedback and UI.
    #[serde(default)]
    pub display_name: String,

    /// Reference clip asset path per stroke type (keyed by the stroke
    /// type's string form).
    #[serde(default)]
    pub clips: BTreeMap<String, String>,
}

/// The corpus root manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusManifest {
    /// Keypoint record format version the corpus was written with.
    pub version: u32,

    /// Per-player manifest data, keyed by reference id.
    #[serde(default)]
    pub players: BTreeMap<String, PlayerManifest>,
}

impl Default for CorpusManifest {
    fn default() -> Self {
        Self {
            version: KEYPOINT_FORMAT_VERSION,
            players: BTreeMap::new(),
        }
    }
}

impl CorpusManifest {
    /// Empty manifest at the current format version.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if this manifest's format version matches the one this build
    /// reads and writes.
    pub fn is_current(&self) -> bool {
        self.version == KEYPOINT_FORMAT_VERSION
    }

    /// The clip asset path for one reference and stroke type.
    pub fn clip_for_reference(
        &self,
        id: &ReferenceId,
        stroke_type: StrokeType,
    ) -> Option<&str> {
        self.players
            .get(id.as_str())
            .and_then(|player| player.clips.get(stroke_type.as_str()))
            .map(String::as_str)
    }

    /// Register or update one player's clip for a stroke type.
    pub fn set_clip(
        &mut self,
        id: &ReferenceId,
        stroke_type: StrokeType,
        asset_path: impl Into<String>,
    ) {
        self.players
            .entry(id.as_str().to_string())
            .or_default()
            .clips
            .insert(stroke_type.as_str().to_string(), asset_path.into());
    }

    /// Load the manifest under a corpus root.
    ///
    /// A missing or unreadable manifest loads as `None`; the corpus is
    /// then treated as an unversioned bare tree with no clip mapping.
    pub async fn load(root: &Path) -> Option<CorpusManifest> {
        let path = manifest_path(root);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "No readable corpus manifest");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(manifest) => Some(manifest),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Corrupt corpus manifest, ignoring");
                None
            }
        }
    }

    /// Write the manifest atomically under a corpus root.
    pub async fn save(&self, root: &Path) -> CorpusResult<()> {
        let path = manifest_path(root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        if let Err(err) = fs::rename(&tmp, &path).await {
            let _ = std::fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }
}
