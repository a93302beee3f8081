use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::aggregate::CategoryBin;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: composition class → Color32
// ---------------------------------------------------------------------------

/// Gives each composition class in a histogram its own bar colour.
#[derive(Debug, Clone, Default)]
pub struct ClassColors {
    mapping: BTreeMap<String, Color32>,
}

impl ClassColors {
    /// Build a colour map from the bins of a composition histogram.
    pub fn from_bins(bins: &[CategoryBin]) -> Self {
        let palette = generate_palette(bins.len());
        let mapping = bins
            .iter()
            .zip(palette)
            .map(|(bin, color)| (bin.category.clone(), color))
            .collect();
        ClassColors { mapping }
    }

    /// Look up the colour for a class; unknown classes are grey.
    pub fn color_for(&self, class: &str) -> Color32 {
        self.mapping.get(class).copied().unwrap_or(Color32::GRAY)
    }
}
