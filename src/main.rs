mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::RustyReelsApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    log::info!("Using dataset {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Reels – Title Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyReelsApp::new(config)))),
    )
}
