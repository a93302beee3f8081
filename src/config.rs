use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::MassBoundPolicy;
use crate::data::loader::DEFAULT_SOURCE_URL;

/// Meteorite landings dashboard.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Config {
    /// URL of the meteorite landings API
    #[arg(long, env = "METEOR_SOURCE_URL", value_name = "URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Load a local dump (.json, .csv or .parquet) instead of fetching
    #[arg(long, env = "METEOR_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Upper end of the mass slider, in grams
    #[arg(long, env = "METEOR_MASS_SLIDER_MAX", default_value_t = 100_000)]
    pub mass_slider_max: i64,

    /// Let each mass bound excuse unknown masses only at its own default
    #[arg(long, env = "METEOR_INDEPENDENT_MASS_BOUNDS")]
    pub independent_mass_bounds: bool,

    /// Merge composition classes that differ only in case
    #[arg(long, env = "METEOR_FOLD_CLASS_CASE")]
    pub fold_class_case: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            file: None,
            mass_slider_max: 100_000,
            independent_mass_bounds: false,
            fold_class_case: false,
        }
    }
}

impl Config {
    pub fn mass_policy(&self) -> MassBoundPolicy {
        if self.independent_mass_bounds {
            MassBoundPolicy::Independent
        } else {
            MassBoundPolicy::KeyedOnMinimum
        }
    }
}
