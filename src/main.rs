use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use fleetboard::app::FleetboardApp;
use fleetboard::config::{DashboardConfig, DesktopArgs};
use fleetboard::data::loader::load_file;
use fleetboard::state::AppState;

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::from(DesktopArgs::parse());
    config.init_logging();

    let dataset = load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))?;
    let state = AppState::new(Arc::new(dataset), &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fleetboard – Illinois Public Passenger Vehicles",
        options,
        Box::new(|_cc| Ok(Box::new(FleetboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the desktop window: {e}"))
}
