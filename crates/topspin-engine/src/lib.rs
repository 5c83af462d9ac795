//! Stroke analysis engine.
//!
//! Ties the other crates together into one pipeline: video probing and
//! frame sampling (`topspin-media`), pose extraction (`topspin-pose`),
//! phase detection and reference comparison (`topspin-analysis`), and the
//! reference corpus (`topspin-corpus`). The engine tracks each request in
//! an explicit session store and runs every analysis under a deadline.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod session;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use logging::AnalysisLogger;
pub use pipeline::AnalysisEngine;
pub use session::SessionStore;
