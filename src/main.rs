mod app;
mod chart;
mod color;
mod config;
mod data;
mod fetch;
mod state;
mod ui;

use app::CpihDashboardApp;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::from_env();
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CPIH Inflation Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(CpihDashboardApp::new(&cc.egui_ctx, config)))),
    )
}
