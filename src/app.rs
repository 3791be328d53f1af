use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Local;
use eframe::{egui, App, Frame};

use crate::fetcher::{Fetch, Unit};
use crate::presenter::{CompletedFetch, FetchParams, Presenter};
use crate::storage;

const STATUS_GREEN: egui::Color32 = egui::Color32::from_rgb(0, 128, 0);

/// Modal dialogs. At most one is open at a time; the panel behind it is
/// disabled until it is dismissed.
#[derive(Debug)]
enum Dialog {
    InputError(String),
    ConfirmSave { location: String, report: String },
    Notice { title: &'static str, message: String },
}

/// The weather window. Form inputs live here; fetch-cycle state lives in the
/// `Presenter`. A finished background fetch parks its result in `completed`
/// until the next frame picks it up.
pub struct WeatherApp {
    location_input: String,
    unit: Unit,
    presenter: Presenter,
    fetcher: Arc<dyn Fetch>,
    completed: Arc<Mutex<Option<CompletedFetch>>>,
    dialog: Option<Dialog>,
}

impl WeatherApp {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            location_input: String::new(),
            unit: Unit::default(),
            presenter: Presenter::new(),
            fetcher,
            completed: Arc::new(Mutex::new(None)),
            dialog: None,
        }
    }

    /// Validates the form and either starts a background fetch or opens the
    /// input-error dialog. No request leaves when validation fails.
    fn start_fetch(&mut self) {
        match self.presenter.trigger(&self.location_input, Some(self.unit)) {
            Ok(params) => self.spawn_fetch(params),
            Err(err) => self.dialog = Some(Dialog::InputError(err.to_string())),
        }
    }

    /// Runs one fetch on a background thread so the window keeps painting.
    /// Exactly one fetch is ever in flight: the presenter rejects triggers
    /// until the result has been collected.
    fn spawn_fetch(&self, params: FetchParams) {
        log::debug!("fetching weather for {} (u={})", params.location, params.unit.code());

        let fetcher = Arc::clone(&self.fetcher);
        let slot = Arc::clone(&self.completed);
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let report = rt.block_on(fetcher.fetch(&params.location, params.unit));
            *slot.lock().unwrap() = Some(CompletedFetch {
                location: params.location,
                report,
                finished_at: Local::now(),
            });
        });
    }

    /// Picks up a finished fetch, renders it, and opens the save prompt.
    /// The prompt fires for failure text too.
    fn poll_completed(&mut self) {
        let done = self.completed.lock().unwrap().take();
        if let Some(done) = done {
            self.presenter.complete(&done);
            self.dialog = Some(Dialog::ConfirmSave {
                location: done.location,
                report: done.report,
            });
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };

        let mut keep = true;
        let mut next: Option<Dialog> = None;

        match &dialog {
            Dialog::InputError(message) => {
                modal(ctx, "Input Error", |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        keep = false;
                    }
                });
            }
            Dialog::ConfirmSave { location, report } => {
                modal(ctx, "Save to File", |ui| {
                    ui.label("Do you want to save this information to a file?");
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() {
                            next = Some(save_report_dialog(location, report));
                            keep = false;
                        }
                        if ui.button("No").clicked() {
                            keep = false;
                        }
                    });
                });
            }
            Dialog::Notice { title, message } => {
                modal(ctx, title, |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        keep = false;
                    }
                });
            }
        }

        self.dialog = if keep { Some(dialog) } else { next };
    }
}

impl App for WeatherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_completed();

        // Keep painting while a fetch is out so the slot gets polled.
        if self.presenter.is_fetching() {
            ctx.request_repaint();
        }

        let dialog_open = self.dialog.is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_enabled(!dialog_open);
            ui.vertical_centered(|ui| {
                ui.heading("Weather App");
                ui.add_space(10.0);

                ui.label("Enter Location:");
                ui.add(egui::TextEdit::singleline(&mut self.location_input).desired_width(220.0));
                ui.add_space(5.0);

                ui.label("Select Temperature Unit:");
                egui::ComboBox::from_id_source("unit")
                    .selected_text(self.unit.label())
                    .show_ui(ui, |ui| {
                        for unit in Unit::ALL {
                            ui.selectable_value(&mut self.unit, unit, unit.label());
                        }
                    });
                ui.add_space(10.0);

                let trigger = egui::Button::new("Fetch Weather");
                if ui.add_enabled(self.presenter.trigger_enabled(), trigger).clicked() {
                    self.start_fetch();
                }
                ui.add_space(10.0);

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .max_height(ui.available_height() - 30.0)
                    .show(ui, |ui| {
                        ui.add(
                            egui::Label::new(egui::RichText::new(self.presenter.output()).monospace())
                                .wrap(true),
                        );
                    });

                ui.label(egui::RichText::new(self.presenter.status()).color(STATUS_GREEN));
            });
        });

        self.show_dialog(ctx);
    }
}

fn modal(ctx: &egui::Context, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, add_contents);
}

/// Saves into the working directory and reports the outcome as a dialog.
fn save_report_dialog(location: &str, report: &str) -> Dialog {
    match storage::save_report(Path::new("."), location, report, Local::now()) {
        Ok(path) => {
            log::info!("saved weather report to {}", path.display());
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Dialog::Notice {
                title: "Success",
                message: format!("Weather information saved to {filename}"),
            }
        }
        Err(err) => {
            log::warn!("failed to save weather report: {err}");
            Dialog::Notice {
                title: "Save Failed",
                message: format!("Could not save weather information: {err}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    struct StubFetcher(&'static str);

    #[async_trait]
    impl Fetch for StubFetcher {
        async fn fetch(&self, _location: &str, _unit: Unit) -> String {
            self.0.to_string()
        }
    }

    fn wait_for_completion(app: &WeatherApp) {
        for _ in 0..200 {
            if app.completed.lock().unwrap().is_some() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("fetch did not complete in time");
    }

    #[test]
    fn fetch_cycle_renders_report_and_prompts_save() {
        let mut app =
            WeatherApp::new(Arc::new(StubFetcher("London: Sunny +20°C ↗11km/h 40% 0.0mm")));
        app.location_input = "London".to_string();

        app.start_fetch();
        assert!(app.presenter.is_fetching());
        assert!(!app.presenter.trigger_enabled());

        wait_for_completion(&app);
        app.poll_completed();

        assert!(app.presenter.trigger_enabled());
        let output = app.presenter.output();
        assert!(output.contains("Weather Information for London:"));
        assert!(output.contains("London: Sunny +20°C ↗11km/h 40% 0.0mm"));
        assert!(output.contains("Data fetched at: "));
        assert!(matches!(app.dialog, Some(Dialog::ConfirmSave { .. })));
    }

    #[test]
    fn failure_text_is_rendered_and_still_prompts_save() {
        let mut app =
            WeatherApp::new(Arc::new(StubFetcher("Error: Unable to fetch weather data.")));
        app.location_input = "Nowhere".to_string();

        app.start_fetch();
        wait_for_completion(&app);
        app.poll_completed();

        assert!(app
            .presenter
            .output()
            .contains("Error: Unable to fetch weather data."));
        assert!(matches!(app.dialog, Some(Dialog::ConfirmSave { .. })));
    }

    #[test]
    fn empty_location_opens_input_error_without_fetching() {
        let mut app = WeatherApp::new(Arc::new(StubFetcher("unused")));
        app.location_input = "   ".to_string();

        app.start_fetch();

        assert!(!app.presenter.is_fetching());
        match &app.dialog {
            Some(Dialog::InputError(message)) => {
                assert_eq!(message, "Please enter a valid location.");
            }
            other => panic!("expected input-error dialog, got {other:?}"),
        }
        assert!(app.completed.lock().unwrap().is_none());
    }
}
