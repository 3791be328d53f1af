//! Desktop viewer for wttr.in weather reports.
//!
//! Type a location, pick a temperature unit, fetch a plain-text report, and
//! optionally save it to a file. The `presenter` module owns the fetch-cycle
//! state independently of the UI so it can be tested without a window.

use std::sync::Arc;

use eframe::egui;

pub mod app;
pub mod fetcher;
pub mod presenter;
pub mod storage;

pub use app::WeatherApp;
pub use fetcher::{Fetch, Unit, WttrFetcher};
pub use presenter::{InputError, Presenter};

/// Opens the weather window and runs it to close.
pub fn run() -> anyhow::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(500.0, 400.0)),
        ..Default::default()
    };

    let app = WeatherApp::new(Arc::new(WttrFetcher::new()));
    eframe::run_native("Weather App", options, Box::new(|_cc| Box::new(app)))
        .map_err(|err| anyhow::anyhow!("failed to run the weather window: {err}"))
}
