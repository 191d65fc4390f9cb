//! Influenza A Data Dashboard
//!
//! A Rust application for viewing WHO FluNet influenza A surveillance counts
//! as an interactive table and area chart.

mod charts;
mod data;
mod gui;

use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([900.0, 650.0])
            .with_title("Influenza A Data Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Influenza A Data Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
}
