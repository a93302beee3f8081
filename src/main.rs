mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::MeteorStrikesApp;
use clap::Parser;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Meteor Strikes – Meteorite Landings",
        options,
        Box::new(|cc| Ok(Box::new(MeteorStrikesApp::new(cc, config)))),
    )
}
