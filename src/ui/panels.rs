use eframe::egui::{self, Color32, RichText, Sense, Slider, TextEdit, Ui};

use crate::data::range::{RangeSelector, Stacking};
use crate::state::{AppState, DatasetState};

const TRACK_COLOR: Color32 = Color32::from_rgb(0xC6, 0xC6, 0xC6);
const RANGE_COLOR: Color32 = Color32::from_rgb(0x25, 0xDA, 0xA5);

// ---------------------------------------------------------------------------
// Left side panel – search form
// ---------------------------------------------------------------------------

/// Render the left search panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Search");
    ui.separator();

    match &state.dataset {
        DatasetState::Loading => {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label("Fetching meteorite data…");
            });
        }
        DatasetState::Failed(_) => {
            ui.label(RichText::new("No data available.").color(Color32::RED));
        }
        DatasetState::Ready(_) => {}
    }

    let ready = state.is_ready();
    ui.add_enabled_ui(ready, |ui: &mut Ui| {
        ui.label("Name");
        ui.add(TextEdit::singleline(&mut state.form.name).hint_text("e.g. Aachen"));

        ui.label("Year");
        ui.add(TextEdit::singleline(&mut state.form.year).hint_text("YYYY"));

        ui.label("Class");
        ui.add(TextEdit::singleline(&mut state.form.recclass).hint_text("e.g. L6"));

        ui.add_space(6.0);
        mass_range(ui, &mut state.mass_range);
        ui.add_space(6.0);

        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Search").clicked() {
                state.mass_range.apply_text_inputs();
                match state.submit() {
                    Ok(n) => log::info!("Search matched {n} meteorites"),
                    Err(e) => {
                        log::warn!("Search rejected: {e}");
                        state.status_message = Some(e.to_string());
                    }
                }
            }
            if ui.button("Reset").clicked() {
                if let Err(e) = state.reset() {
                    log::warn!("Reset rejected: {e}");
                }
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Mass range widget
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Handle {
    Low,
    High,
}

/// Two sliders, a fill track and two precise inputs for the mass range.
fn mass_range(ui: &mut Ui, range: &mut RangeSelector) {
    ui.strong("Mass range (g)");

    // The handle that must stay reachable is laid out first.
    let order = match range.stacking() {
        Stacking::LowOnTop => [Handle::Low, Handle::High],
        Stacking::HighOnTop => [Handle::High, Handle::Low],
    };
    let bounds = range.min()..=range.max();

    for handle in order {
        match handle {
            Handle::Low => {
                let mut value = range.lo();
                let slider = Slider::new(&mut value, bounds.clone())
                    .logarithmic(true)
                    .show_value(false)
                    .text("from");
                if ui.add(slider).changed() {
                    range.on_low_changed(value);
                }
            }
            Handle::High => {
                let mut value = range.hi();
                let slider = Slider::new(&mut value, bounds.clone())
                    .logarithmic(true)
                    .show_value(false)
                    .text("to");
                if ui.add(slider).changed() {
                    range.on_high_changed(value);
                }
            }
        }
    }

    fill_track(ui, range);

    ui.horizontal(|ui: &mut Ui| {
        let low = ui.add(TextEdit::singleline(&mut range.lo_text).desired_width(70.0));
        if low.lost_focus() {
            let text = range.lo_text.clone();
            range.on_low_input(&text);
        }
        ui.label("–");
        let high = ui.add(TextEdit::singleline(&mut range.hi_text).desired_width(70.0));
        if high.lost_focus() {
            let text = range.hi_text.clone();
            range.on_high_input(&text);
        }
    });
}

/// Grey track with the selected span highlighted.
fn fill_track(ui: &mut Ui, range: &RangeSelector) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 6.0), Sense::hover());
    let fill = range.fill();
    let selected = egui::Rect::from_min_max(
        egui::pos2(rect.left() + rect.width() * fill.start, rect.top()),
        egui::pos2(rect.left() + rect.width() * fill.end, rect.bottom()),
    );
    let painter = ui.painter();
    painter.rect_filled(rect, 3.0, TRACK_COLOR);
    painter.rect_filled(selected, 3.0, RANGE_COLOR);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match &state.dataset {
            DatasetState::Loading => {
                ui.label("Loading…");
            }
            DatasetState::Ready(ds) => {
                let shown = state
                    .dashboard
                    .as_ref()
                    .map_or(0, |d| d.rows.len());
                ui.label(format!("{} meteorites loaded, {shown} shown", ds.len()));
            }
            DatasetState::Failed(message) => {
                ui.label(RichText::new(format!("Error: {message}")).color(Color32::RED));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open meteorite data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(&path);
    }
}
