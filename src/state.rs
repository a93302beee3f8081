use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use anyhow::anyhow;
use thiserror::Error;

use crate::color::ClassColors;
use crate::config::Config;
use crate::data::aggregate::{
    CategoryBin, SummaryMetrics, YearHistogram, histogram_by_composition,
    histogram_by_composition_folded, histogram_by_year, summarize,
};
use crate::data::filter::{FilterParams, MassBoundPolicy, filter};
use crate::data::loader;
use crate::data::model::{Dataset, Record, SharedDataset};
use crate::data::range::RangeSelector;
use crate::data::table::TableRow;

// ---------------------------------------------------------------------------
// Errors surfaced to the user
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("The dataset has not been loaded yet")]
    DatasetNotReady,

    #[error("Year must be a number of at most four digits, got '{0}'")]
    InvalidYear(String),
}

// ---------------------------------------------------------------------------
// Dataset lifecycle
// ---------------------------------------------------------------------------

/// Where the one and only dataset is in its lifecycle.
#[derive(Debug, Clone)]
pub enum DatasetState {
    /// Fetch in flight (or nothing requested yet).
    Loading,
    Ready(SharedDataset),
    /// Load failed with the given message; the dashboard stays empty.
    Failed(String),
}

// ---------------------------------------------------------------------------
// Search form
// ---------------------------------------------------------------------------

/// Text fields of the search form, read only when the form is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub name: String,
    pub year: String,
    pub recclass: String,
}

impl SearchForm {
    /// Combine the form fields with the mass range into filter parameters.
    pub fn to_params(
        &self,
        mass_range: &RangeSelector,
        mass_policy: MassBoundPolicy,
    ) -> Result<FilterParams, DashboardError> {
        let (mass_min, mass_max) = mass_range.mass_bounds();
        Ok(FilterParams {
            name: text_param(&self.name),
            year: parse_year(&self.year)?,
            recclass: text_param(&self.recclass),
            mass_min,
            mass_max,
            mass_policy,
        })
    }
}

fn text_param(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn parse_year(text: &str) -> Result<Option<i32>, DashboardError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if text.len() > 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DashboardError::InvalidYear(text.to_string()));
    }
    text.parse::<i32>()
        .map(Some)
        .map_err(|_| DashboardError::InvalidYear(text.to_string()))
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// Everything the panels draw, recomputed from scratch on each search/reset.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: SummaryMetrics,
    pub years: YearHistogram,
    pub classes: Vec<CategoryBin>,
    pub class_colors: ClassColors,
    /// Table rows for the records in view, in source order.
    pub rows: Vec<TableRow>,
    /// Whether a search narrowed the view.
    pub filtered: bool,
}

impl Dashboard {
    fn build(subset: &[&Record], fold_class_case: bool, filtered: bool) -> Self {
        let records = subset.iter().copied();

        let classes = if fold_class_case {
            histogram_by_composition_folded(records.clone())
        } else {
            histogram_by_composition(records.clone())
        };

        Self {
            summary: summarize(records.clone()),
            years: histogram_by_year(records.clone()),
            class_colors: ClassColors::from_bins(&classes),
            classes,
            rows: records.map(TableRow::from_record).collect(),
            filtered,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// The dataset, owned here and handed out as shared snapshots.
    pub dataset: DatasetState,

    pub form: SearchForm,

    /// Mass range widget.
    pub mass_range: RangeSelector,

    /// Derived view; `None` until a dataset is ready.
    pub dashboard: Option<Dashboard>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Channel of the background fetch, if one is in flight.
    pending_fetch: Option<Receiver<anyhow::Result<Dataset>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mass_range = RangeSelector::new(0, config.mass_slider_max);
        Self {
            config,
            dataset: DatasetState::Loading,
            form: SearchForm::default(),
            mass_range,
            dashboard: None,
            status_message: None,
            pending_fetch: None,
        }
    }

    /// Whether searching and resetting are possible.
    pub fn is_ready(&self) -> bool {
        matches!(self.dataset, DatasetState::Ready(_))
    }

    /// Current dataset snapshot, if loaded.
    pub fn snapshot(&self) -> Option<SharedDataset> {
        match &self.dataset {
            DatasetState::Ready(ds) => Some(Arc::clone(ds)),
            _ => None,
        }
    }

    /// Track a background fetch started with [`loader::spawn_fetch`].
    pub fn await_fetch(&mut self, receiver: Receiver<anyhow::Result<Dataset>>) {
        self.dataset = DatasetState::Loading;
        self.pending_fetch = Some(receiver);
    }

    /// Pick up the fetch result if it has arrived. Returns `true` on change.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(receiver) = &self.pending_fetch else {
            return false;
        };
        let outcome = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(anyhow!("dataset loader stopped without a result"))
            }
        };
        self.pending_fetch = None;

        match outcome {
            Ok(dataset) => {
                let source = self.config.source_url.clone();
                self.set_dataset(dataset, &source);
            }
            Err(e) => self.set_load_failed(&e),
        }
        true
    }

    /// Load a local dump synchronously.
    ///
    /// If a dataset is already loaded, a failure only reports the error and
    /// the current dataset and dashboard stay in place.
    pub fn load_file(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset, &path.display().to_string()),
            Err(e) if self.is_ready() => {
                log::error!("Failed to open {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
            Err(e) => self.set_load_failed(&e),
        }
    }

    /// Ingest a newly loaded dataset and show it unfiltered.
    pub fn set_dataset(&mut self, dataset: Dataset, source: &str) {
        if dataset.is_empty() {
            log::warn!("Dataset from {source} contains no records");
        } else {
            log::info!("Loaded {} meteorites from {source}", dataset.len());
        }
        self.pending_fetch = None;
        self.dataset = DatasetState::Ready(Arc::new(dataset));
        self.status_message = None;
        self.form = SearchForm::default();
        self.mass_range.reset();
        self.show_all();
    }

    /// Record a load failure when there is no dataset to fall back on.
    pub fn set_load_failed(&mut self, error: &anyhow::Error) {
        log::error!("Failed to load dataset: {error:#}");
        self.dataset = DatasetState::Failed(format!("{error:#}"));
        self.status_message = None;
        self.dashboard = None;
    }

    /// Run the search form against the dataset. Returns the match count.
    pub fn submit(&mut self) -> Result<usize, DashboardError> {
        let dataset = self.snapshot().ok_or(DashboardError::DatasetNotReady)?;
        let params = self
            .form
            .to_params(&self.mass_range, self.config.mass_policy())?;

        let subset = filter(&dataset, &params);
        log::debug!(
            "Filter {params:?} matched {} of {} records",
            subset.len(),
            dataset.len()
        );

        let matched = subset.len();
        self.dashboard = Some(Dashboard::build(&subset, self.config.fold_class_case, true));
        self.status_message = None;
        Ok(matched)
    }

    /// Clear the form and show the whole dataset again.
    pub fn reset(&mut self) -> Result<(), DashboardError> {
        if !self.is_ready() {
            return Err(DashboardError::DatasetNotReady);
        }
        self.form = SearchForm::default();
        self.mass_range.reset();
        self.status_message = None;
        self.show_all();
        Ok(())
    }

    fn show_all(&mut self) {
        let fold_class_case = self.config.fold_class_case;
        self.dashboard = self.snapshot().map(|dataset| {
            let all: Vec<&Record> = dataset.iter().collect();
            Dashboard::build(&all, fold_class_case, false)
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::data::model::tests::record;

    fn scenario() -> Dataset {
        Dataset::from_records(vec![
            record(Some("Alpha"), Some("L6"), Some(100.0), Some("2000-01-01")),
            record(Some("Beta"), Some("l6"), None, Some("1999-06-01")),
            record(Some("Gamma"), Some("H5"), Some(300.0), None),
        ])
    }

    fn row_names(state: &AppState) -> Vec<&str> {
        let dash = state.dashboard.as_ref().unwrap();
        dash.rows.iter().map(|r| r.name.as_str()).collect()
    }

    fn ready_state(config: Config) -> AppState {
        let mut state = AppState::new(config);
        state.set_dataset(scenario(), "test");
        state
    }

    #[test]
    fn actions_before_load_are_refused() {
        let mut state = AppState::default();
        assert!(!state.is_ready());
        assert_eq!(state.submit(), Err(DashboardError::DatasetNotReady));
        assert_eq!(state.reset(), Err(DashboardError::DatasetNotReady));
        assert!(state.dashboard.is_none());
    }

    #[test]
    fn loading_shows_everything() {
        let state = ready_state(Config::default());
        let dash = state.dashboard.as_ref().unwrap();
        assert!(!dash.filtered);
        assert_eq!(row_names(&state), vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(dash.summary.total_count_text(), "3");
        assert_eq!(dash.summary.average_mass_text(), "200.00");
        let cats: Vec<&str> = dash.classes.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(cats, vec!["H5", "L6", "l6"]);
    }

    #[test]
    fn submit_applies_form_and_mass_range() {
        let mut state = ready_state(Config::default());
        state.mass_range.on_high_changed(50);
        assert_eq!(state.submit(), Ok(1));

        let dash = state.dashboard.as_ref().unwrap();
        assert!(dash.filtered);
        assert_eq!(dash.summary.average_mass, 0.0);
        assert_eq!(row_names(&state), vec!["Beta"]);
    }

    #[test]
    fn submit_by_year_and_class() {
        let mut state = ready_state(Config::default());
        state.form.year = "2000".into();
        assert_eq!(state.submit(), Ok(1));

        state.form.year.clear();
        state.form.recclass = "L6".into();
        assert_eq!(state.submit(), Ok(2));
    }

    #[test]
    fn invalid_year_is_reported() {
        let mut state = ready_state(Config::default());
        state.form.year = "20x0".into();
        assert_eq!(state.submit(), Err(DashboardError::InvalidYear("20x0".into())));
        state.form.year = "12345".into();
        assert!(state.submit().is_err());
        assert!(!state.dashboard.as_ref().unwrap().filtered);
    }

    #[test]
    fn reset_restores_full_view() {
        let mut state = ready_state(Config::default());
        state.form.name = "alp".into();
        state.mass_range.on_low_changed(10);
        state.submit().unwrap();
        assert_eq!(row_names(&state), vec!["Alpha"]);

        state.reset().unwrap();
        assert_eq!(state.form, SearchForm::default());
        assert_eq!(state.mass_range.lo(), 0);
        let dash = state.dashboard.as_ref().unwrap();
        assert!(!dash.filtered);
        assert_eq!(dash.rows.len(), 3);
    }

    #[test]
    fn folding_config_merges_classes() {
        let state = ready_state(Config {
            fold_class_case: true,
            ..Config::default()
        });
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.classes.len(), 2);
    }

    #[test]
    fn independent_bounds_config_drops_unknown_mass() {
        let mut state = ready_state(Config {
            independent_mass_bounds: true,
            ..Config::default()
        });
        state.mass_range.on_high_changed(50);
        assert_eq!(state.submit(), Ok(0));
    }

    #[test]
    fn poll_picks_up_fetch_result() {
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        state.await_fetch(rx);
        assert!(!state.poll_fetch());

        tx.send(Ok(scenario())).unwrap();
        assert!(state.poll_fetch());
        assert!(state.is_ready());
        assert_eq!(state.dashboard.as_ref().unwrap().summary.total_count, 3);
        assert!(!state.poll_fetch());
    }

    #[test]
    fn failed_fetch_leaves_visible_error() {
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        state.await_fetch(rx);
        tx.send(Err(anyhow!("Connection to API unsuccessful"))).unwrap();

        assert!(state.poll_fetch());
        let DatasetState::Failed(message) = &state.dataset else {
            panic!("expected a failed load, got {:?}", state.dataset);
        };
        assert!(message.contains("unsuccessful"));
        assert!(state.status_message.is_none());
        assert_eq!(state.submit(), Err(DashboardError::DatasetNotReady));
    }

    #[test]
    fn failed_open_keeps_loaded_dataset() {
        let mut state = AppState::default();
        state.set_dataset(
            Dataset::from_records(vec![record(Some("Alpha"), Some("L6"), Some(1.0), None)]),
            "test",
        );

        state.load_file(Path::new("/nonexistent/dump.json"));

        assert!(state.is_ready());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
        assert_eq!(state.dashboard.as_ref().unwrap().summary.total_count, 1);
        assert_eq!(state.submit(), Ok(1));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn failed_first_open_reports_failure() {
        let mut state = AppState::default();
        state.load_file(Path::new("/nonexistent/dump.json"));
        assert!(matches!(state.dataset, DatasetState::Failed(_)));
        assert!(state.dashboard.is_none());
    }

    #[test]
    fn dropped_loader_counts_as_failure() {
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel::<anyhow::Result<Dataset>>();
        state.await_fetch(rx);
        drop(tx);
        assert!(state.poll_fetch());
        assert!(matches!(state.dataset, DatasetState::Failed(_)));
    }
}
