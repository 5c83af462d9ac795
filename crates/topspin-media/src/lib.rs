//! FFmpeg CLI wrappers for video handling.
//!
//! Shells out to `ffprobe` for stream metadata and `ffmpeg` for frame
//! sampling. Both binaries must be on `PATH`; their absence is reported
//! as a typed error rather than a panic.

pub mod error;
pub mod frames;
pub mod probe;

pub use error::{MediaError, MediaResult};
pub use frames::{sample_frames, SampledFrame};
pub use probe::{probe_video, VideoInfo};
