use std::path::Path;
use std::process::Command;

use topspin_corpus::CorpusStore;
use topspin_engine::EngineConfig;
use topspin_models::StrokeType;
use topspin_pose::HttpPoseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = EngineConfig::from_env();

    println!(
        "engine-selfcheck: starting with work_dir={}",
        config.work_dir.display()
    );
    ensure_workdir(&config.work_dir).await?;
    ensure_tool("ffmpeg")?;
    ensure_tool("ffprobe")?;
    report_corpus(&config).await;
    ensure_pose_service().await?;

    println!("engine-selfcheck: ok");
    Ok(())
}

async fn ensure_workdir<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

fn ensure_tool(tool: &str) -> anyhow::Result<()> {
    let output = Command::new(tool)
        .arg("-version")
        .output()
        .map_err(|e| anyhow::anyhow!("{} not available: {}", tool, e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "{} -version failed: {:?}",
            tool,
            output.status
        ));
    }
    Ok(())
}

/// An empty corpus is a valid deployment state, so this only reports.
async fn report_corpus(config: &EngineConfig) {
    let store = CorpusStore::new(&config.corpus_root);
    for &stroke in StrokeType::ALL {
        let entries = store.load_entries(stroke).await;
        println!(
            "engine-selfcheck: {} references for {}",
            entries.len(),
            stroke
        );
    }
}

async fn ensure_pose_service() -> anyhow::Result<()> {
    let client = HttpPoseClient::from_env()?;
    if !client.health_check().await? {
        return Err(anyhow::anyhow!("pose service is not healthy"));
    }
    Ok(())
}
