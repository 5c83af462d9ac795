//! Filesystem reference corpus.
//!
//! This crate provides:
//! - The corpus tree layout (`{root}/{player_id}/{stroke_type}/{phase}.json`)
//! - The root manifest mapping reference ids to display data and clip assets
//! - Tolerant reads (missing or corrupt records load as absent phases)
//! - Atomic sample replacement for offline ingestion

pub mod error;
pub mod layout;
pub mod manifest;
pub mod store;

pub use error::{CorpusError, CorpusResult};
pub use layout::{
    manifest_path, phase_record_path, player_dir, stroke_dir, KEYPOINT_FORMAT_VERSION,
    MANIFEST_FILE,
};
pub use manifest::{CorpusManifest, PlayerManifest};
pub use store::CorpusStore;
