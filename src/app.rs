use eframe::egui;

use crate::config::Config;
use crate::data::loader;
use crate::state::AppState;
use crate::ui::{panels, plot, records};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MeteorStrikesApp {
    pub state: AppState,
}

impl MeteorStrikesApp {
    /// Start loading the dataset: a local dump if configured, the API otherwise.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut state = AppState::new(config);

        match state.config.file.clone() {
            Some(path) => state.load_file(&path),
            None => {
                let ctx = cc.egui_ctx.clone();
                let url = state.config.source_url.clone();
                let receiver = loader::spawn_fetch(url, move || ctx.request_repaint());
                state.await_fetch(receiver);
            }
        }

        Self { state }
    }
}

impl eframe::App for MeteorStrikesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_fetch();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search form ----
        egui::SidePanel::left("search_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::overview(ui, &self.state);
            ui.separator();
            records::records_table(ui, &self.state);
        });
    }
}
