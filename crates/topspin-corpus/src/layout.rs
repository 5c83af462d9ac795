//! Corpus filesystem layout.
//!
//! ```text
//! {root}/
//!   manifest.json
//!   {player_id}/
//!     {stroke_type}/
//!       preparation.json
//!       impact.json
//!       follow_through.json
//! ```
//!
//! Phase records are bare JSON landmark arrays; a missing file means the
//! phase is absent for that entry.

use std::path::{Path, PathBuf};

use topspin_models::{PhaseKind, StrokeType};

/// Manifest file name at the corpus root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Version of the on-disk keypoint record format. A corpus whose manifest
/// declares a different version reads as empty.
pub const KEYPOINT_FORMAT_VERSION: u32 = 1;

/// Path to the corpus manifest.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

/// Directory holding one player's strokes.
pub fn player_dir(root: &Path, player_id: &str) -> PathBuf {
    root.join(player_id)
}

/// Directory holding one player's records for one stroke type.
pub fn stroke_dir(root: &Path, player_id: &str, stroke_type: StrokeType) -> PathBuf {
    player_dir(root, player_id).join(stroke_type.as_str())
}

/// Path of one phase record file.
pub fn phase_record_path(
    root: &Path,
    player_id: &str,
    stroke_type: StrokeType,
    phase: PhaseKind,
) -> PathBuf {
    stroke_dir(root, player_id, stroke_type).join(format!("{}.json", phase.as_str()))
}
