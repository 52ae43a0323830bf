//! Burrito server entry point.

use anyhow::anyhow;
use burrito_core::init_logging;
use burrito_server::config::{load_env_file, ServerConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env_file(".env")?;
    let config = ServerConfig::parse();

    init_logging(config.effective_log_level(), config.log_dir.as_deref())
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;

    burrito_server::serve(config).await
}
