use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use fleetboard::config::{DashboardConfig, WebArgs};
use fleetboard::data::loader::load_file;
use fleetboard::web::{serve, WebState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::from(WebArgs::parse());
    config.init_logging();

    let dataset = load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))?;

    let addr = config.addr;
    serve(WebState::new(Arc::new(dataset), config), addr).await
}
