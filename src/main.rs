//! GreenLens - Sustainable Supplier Selection Dashboard
//!
//! Loads supplier CSV data, scores sustainability, filters by buyer
//! requirements and simulates supplier substitutions.

mod analysis;
mod charts;
mod config;
mod data;
mod gui;
mod report;
mod scenario;
mod scoring;
mod stats;

use config::AppConfig;
use eframe::egui;
use gui::SupplierApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("GreenLens"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "GreenLens",
        options,
        Box::new(move |cc| Ok(Box::new(SupplierApp::new(cc, config)))),
    )
}
