//! Stroke analysis engine binary.
//!
//! Runs one analysis from the command line and prints the report as JSON
//! on stdout.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use topspin_engine::{AnalysisEngine, EngineConfig};
use topspin_models::AnalysisRequest;
use topspin_pose::HttpPoseClient;

const USAGE: &str =
    "Usage: topspin-engine <video> <forehand|backhand|serve> [left|right] [--trim-rally]";

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("topspin=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let request = match parse_args(std::env::args().skip(1)) {
        Ok(request) => request,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    info!("Starting topspin-engine");

    let config = EngineConfig::from_env();
    info!("Engine config: {:?}", config);

    let pose = match HttpPoseClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create pose client: {}", e);
            std::process::exit(1);
        }
    };

    let engine = AnalysisEngine::new(config, Arc::new(pose));

    match engine.analyze(request).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse positional arguments into an analysis request.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<AnalysisRequest, String> {
    let video = args.next().ok_or("Missing video path")?;
    let stroke = args
        .next()
        .ok_or("Missing stroke type")?
        .parse()
        .map_err(|e| format!("{}", e))?;

    let mut request = AnalysisRequest::new(video, stroke);
    for arg in args {
        match arg.as_str() {
            "--trim-rally" => request = request.with_rally_trim(),
            other => {
                let handedness = other
                    .parse()
                    .map_err(|_| format!("Unknown argument: {}", other))?;
                request = request.with_handedness(handedness);
            }
        }
    }
    Ok(request)
}
