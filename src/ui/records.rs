use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::table::COLUMNS;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Render the visible records as a scrolling table.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), COLUMNS.len())
        .header(20.0, |mut header| {
            for title in COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, dashboard.rows.len(), |mut row| {
                let cells = dashboard.rows[row.index()].cells();
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
