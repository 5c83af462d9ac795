//! Client for the pose-estimation sidecar service.
//!
//! Landmark extraction runs in a separate process that wraps the pose
//! model; this crate provides the HTTP client plus the [`PoseSource`]
//! trait the pipeline consumes. Detection is two-phase: a fast pass for
//! every frame, then a slower accurate pass for frames the fast model
//! misses.

pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use client::{HttpPoseClient, PoseClientConfig};
pub use error::{PoseError, PoseResult};
pub use source::PoseSource;
pub use types::{DetectRequest, DetectResponse, DetectionMode, HealthResponse};
