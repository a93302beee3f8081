use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::{AppState, Dashboard};

const PLOT_HEIGHT: f32 = 220.0;

// ---------------------------------------------------------------------------
// Summary + histograms (top of the central panel)
// ---------------------------------------------------------------------------

/// Render the summary numbers and both histograms.
pub fn overview(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Waiting for meteorite data  (or File → Open…)");
        });
        return;
    };

    summary(ui, dashboard);
    ui.separator();

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong(format!("Strikes per year ({} dated)", dashboard.years.total()));
        year_chart(&mut cols[0], dashboard);
        cols[1].strong("Strikes per composition class");
        class_chart(&mut cols[1], dashboard);
    });
}

fn summary(ui: &mut Ui, dashboard: &Dashboard) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Total strikes:");
        ui.strong(dashboard.summary.total_count_text());
        ui.separator();
        ui.label("Average mass (g):");
        ui.strong(dashboard.summary.average_mass_text());
        if dashboard.filtered {
            ui.separator();
            ui.label("(filtered)");
        }
    });
}

fn year_chart(ui: &mut Ui, dashboard: &Dashboard) {
    if dashboard.years.is_empty() {
        ui.label("No dated records.");
        return;
    }
    let bins = dashboard.years.bins();

    let span = bins
        .last()
        .map_or(0, |last| last.range_end - bins[0].range_start);
    let width = dashboard.years.bar_width(span as f64);

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::new(bin.range_start as f64 + width / 2.0, bin.count as f64)
                .width(width)
                .name(bin.label())
        })
        .collect();

    let chart = BarChart::new(bars)
        .name("Strikes")
        .color(Color32::from_rgb(0x25, 0xDA, 0xA5));

    Plot::new("year_histogram")
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Strikes")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn class_chart(ui: &mut Ui, dashboard: &Dashboard) {
    if dashboard.classes.is_empty() {
        ui.label("No classified records.");
        return;
    }

    let bars: Vec<Bar> = dashboard
        .classes
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            Bar::new(i as f64, bin.count as f64)
                .width(0.8)
                .name(&bin.category)
                .fill(dashboard.class_colors.color_for(&bin.category))
        })
        .collect();

    Plot::new("class_histogram")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Class")
        .y_axis_label("Strikes")
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars).name("Classes")));
}
