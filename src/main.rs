//! QualSteam Viewer - Customer Trial Data Dashboard
//!
//! Loads a trial CSV and shows temperature, pressure, flow rate and valve
//! opening as four time-linked panels.

mod charts;
mod config;
mod data;
mod gui;
mod pipeline;

use anyhow::Result;
use config::{AppConfig, CONFIG_FILE};
use eframe::egui;
use gui::TrialViewerApp;
use std::path::Path;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::load(Path::new(CONFIG_FILE))?;
    let title = config.page_title.clone();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([1000.0, 700.0])
            .with_title(&title),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(TrialViewerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
