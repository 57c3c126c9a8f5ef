mod app;
mod color;
mod config;
mod data;
mod dispatch;
mod geo;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use config::DashboardConfig;
use data::loader::load_source;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("reading configuration")?;

    log::info!("Loading electricity prices from {}", config.source);
    let dataset = load_source(&config.source, &config.fetch).map_err(|e| {
        log::error!("Failed to load dataset: {e}");
        e
    })?;
    log::info!(
        "Loaded {} rows, years {}–{}, columns {:?}",
        dataset.len(),
        dataset.year_min,
        dataset.year_max,
        dataset.columns
    );
    for code in geo::unmapped(dataset.records.iter().map(|r| r.state.as_str())) {
        log::warn!("State '{code}' has no map tile; it only appears in the table");
    }
    let dataset = Arc::new(dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Electricity Prices by US State",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(dataset)))),
    )
    .map_err(|e| anyhow!("running the dashboard: {e}"))
}
