use std::path::PathBuf;

use anyhow::{Context, Result};

use rw_config::RoadwatchConfig;
use rw_runtime::lifecycle::{FeedEngine, wait_for_signal};
use rw_runtime::tracing_init::init_tracing;

pub(crate) async fn run(config: PathBuf) -> Result<()> {
    let config_path = config
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("config path '{}': {e}", config.display()))?;
    let roadwatch_config = RoadwatchConfig::load(&config_path)?;
    let base_dir = config_path
        .parent()
        .context("config path has no parent directory")?;

    let _guard = init_tracing(&roadwatch_config.logging, base_dir)?;

    let engine = FeedEngine::start(roadwatch_config, base_dir)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    tracing::info!(domain = "sys", config = %config_path.display(), "roadwatch feed started");

    wait_for_signal(engine.cancel_token()).await;
    let last = engine.latest();
    engine.shutdown();
    engine.wait().await.map_err(|e| anyhow::anyhow!("{e}"))?;
    tracing::info!(
        domain = "sys",
        snapshots = last.seq,
        active = last.len(),
        "roadwatch feed stopped"
    );
    Ok(())
}
