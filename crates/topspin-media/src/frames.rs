//! Frame sampling via FFmpeg.
//!
//! Decodes a video into numbered JPEG files so pose detection can run on
//! individual frames. Frames are written as `frame_%06d.jpg` and indexed
//! from zero.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

const FRAME_PREFIX: &str = "frame_";
const FRAME_PATTERN: &str = "frame_%06d.jpg";

/// One sampled frame on disk.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// Zero-based frame index at the sampling rate
    pub index: usize,
    /// Timestamp in seconds at the sampling rate
    pub timestamp_secs: f64,
    /// Path to the JPEG file
    pub path: PathBuf,
}

impl SampledFrame {
    /// Read the JPEG bytes from disk.
    pub async fn read(&self) -> MediaResult<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Sample a video into JPEG frames at `fps` frames per second.
///
/// Frames land in `output_dir` (created if missing). The returned list is
/// ordered by frame index.
pub async fn sample_frames(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    fps: f64,
    timeout_secs: Option<u64>,
) -> MediaResult<Vec<SampledFrame>> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }
    if !(fps > 0.0) {
        return Err(MediaError::InvalidVideo(format!(
            "Non-positive sampling rate: {}",
            fps
        )));
    }

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    std::fs::create_dir_all(output_dir)?;
    let pattern = output_dir.join(FRAME_PATTERN);

    debug!(
        "Sampling {} at {} fps into {}",
        input.display(),
        fps,
        output_dir.display()
    );

    let mut child = Command::new("ffmpeg")
        .arg("-y")
        .args(["-v", "error"])
        .arg("-i")
        .arg(input)
        .args(["-vf", &format!("fps={}", fps)])
        .args(["-q:v", "2"])
        .arg(&pattern)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut stderr = child.stderr.take().expect("stderr not captured");
    let stderr_handle = tokio::spawn(async move {
        let mut buf = String::new();
        let _ = stderr.read_to_string(&mut buf).await;
        buf
    });

    let status = match timeout_secs {
        Some(secs) => {
            match tokio::time::timeout(Duration::from_secs(secs), child.wait()).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!("FFmpeg timed out after {} seconds, killing process", secs);
                    let _ = child.kill().await;
                    return Err(MediaError::Timeout(secs));
                }
            }
        }
        None => child.wait().await?,
    };

    let stderr_text = stderr_handle.await.unwrap_or_default();

    if !status.success() {
        return Err(MediaError::ffmpeg_failed(
            "Frame sampling failed",
            Some(stderr_text),
            status.code(),
        ));
    }

    let frames = collect_frames(output_dir, fps)?;
    if frames.is_empty() {
        return Err(MediaError::InvalidVideo(
            "No frames extracted from video".to_string(),
        ));
    }

    Ok(frames)
}

/// Scan `dir` for extracted frames and order them by index.
fn collect_frames(dir: &Path, fps: f64) -> MediaResult<Vec<SampledFrame>> {
    let mut frames = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(index) = parse_frame_index(name) {
            frames.push(SampledFrame {
                index,
                timestamp_secs: index as f64 / fps,
                path,
            });
        }
    }

    frames.sort_by_key(|f| f.index);
    Ok(frames)
}

/// Parse the zero-based index out of `frame_NNNNNN.jpg`.
///
/// FFmpeg numbers output frames from 1.
fn parse_frame_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(FRAME_PREFIX)?.strip_suffix(".jpg")?;
    let number: usize = digits.parse().ok()?;
    number.checked_sub(1)
}
