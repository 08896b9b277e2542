mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;
mod views;

use anyhow::Context;
use app::CarLotApp;
use clap::Parser;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = config::Cli::parse();

    // The one disk side effect: unpack the archive before any view is resolved.
    let extract_dir = cli.extract_dir().context("resolving extract directory")?;
    let dataset = data::loader::prepare(&cli.archive, &extract_dir, &cli.csv_name)
        .inspect_err(|e| log::error!("Failed to load dataset: {e}"))
        .with_context(|| format!("preparing dataset from {}", cli.archive.display()))?;
    if dataset.is_empty() {
        log::warn!("No complete rows in {}; every chart will be empty", cli.csv_name);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        app::APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(CarLotApp::new(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
