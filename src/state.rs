use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::data::filter::{CountrySelection, FilterCriteria};
use crate::data::model::TitleDataset;
use crate::data::pipeline::{self, LoadState, PipelineOutcome};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The widgets only ever change `criteria` through the setters below; each
/// setter re-runs the pipeline synchronously so `outcome` always matches the
/// current selection.
pub struct AppState {
    pub config: AppConfig,

    /// The catalogue, or why it could not be read. Replaced wholesale on load.
    pub load: LoadState,

    /// Where `load` came from.
    pub source: Option<PathBuf>,

    /// Current side-panel selection.
    pub criteria: FilterCriteria,

    /// What the central panel renders.
    pub outcome: PipelineOutcome,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            load: LoadState::NotLoaded,
            source: None,
            criteria: FilterCriteria::default(),
            outcome: PipelineOutcome::NotLoaded,
        }
    }

    /// Load the configured dataset.
    pub fn load_configured(&mut self) {
        let path = self.config.data_path.clone();
        self.load_path(&path);
    }

    /// Read `path` and make it the active dataset. A failure replaces any
    /// previous dataset so stale rows are never shown next to the error.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} titles from {} (years {:?}, {} countries)",
                    dataset.len(),
                    path.display(),
                    dataset.year_bounds(),
                    dataset.countries.len()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.load = LoadState::Failed(format!("{e:#}"));
                self.refresh();
            }
        }
        self.source = Some(path.to_path_buf());
    }

    /// Ingest a newly loaded dataset and reset the criteria to its defaults.
    pub fn set_dataset(&mut self, dataset: TitleDataset) {
        self.criteria = FilterCriteria::for_dataset(&dataset, self.config.default_year_range);
        self.load = LoadState::Loaded(dataset);
        self.refresh();
    }

    pub fn dataset(&self) -> Option<&TitleDataset> {
        self.load.dataset()
    }

    /// Recompute `outcome` for the current criteria.
    pub fn refresh(&mut self) {
        self.outcome = pipeline::evaluate(&self.load, &self.criteria);
    }

    /// Set the year range. The ends are clamped to the observed years.
    pub fn set_year_range(&mut self, from: i32, to: i32) {
        let mut criteria = FilterCriteria {
            year_range: (from, to),
            ..self.criteria.clone()
        };
        if let Some(ds) = self.dataset() {
            criteria.clamp_years(ds);
        }
        self.update(criteria);
    }

    pub fn set_country(&mut self, country: CountrySelection) {
        let criteria = FilterCriteria {
            country,
            ..self.criteria.clone()
        };
        self.update(criteria);
    }

    pub fn set_search_term(&mut self, term: &str) {
        let criteria = FilterCriteria {
            search_term: term.to_string(),
            ..self.criteria.clone()
        };
        self.update(criteria);
    }

    /// Back to the defaults of the loaded dataset.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = self.dataset() {
            let criteria = FilterCriteria::for_dataset(ds, self.config.default_year_range);
            self.update(criteria);
        }
    }

    /// Full year range, every country, no search.
    pub fn show_everything(&mut self) {
        if let Some(ds) = self.dataset() {
            let criteria = FilterCriteria::everything(ds);
            self.update(criteria);
        }
    }

    fn update(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::catalogue;

    fn state() -> AppState {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(catalogue());
        state
    }

    #[test]
    fn test_new_dataset_uses_clamped_defaults() {
        let state = state();
        assert_eq!(state.criteria.year_range, (2015, 2021));
        let d = state.outcome.dashboard().unwrap();
        // 2016, 2020 and five 2021 titles.
        assert_eq!(d.metrics.total, 7);
    }

    #[test]
    fn test_setters_rerun_pipeline() {
        let mut state = state();
        state.set_year_range(1900, 2100);
        assert_eq!(state.criteria.year_range, (1975, 2021));
        assert_eq!(state.outcome.dashboard().unwrap().metrics.total, 12);

        state.set_country(CountrySelection::Exact("United States".into()));
        assert_eq!(state.outcome.dashboard().unwrap().metrics.total, 5);

        state.set_search_term("jaws");
        assert_eq!(state.outcome.dashboard().unwrap().rows, vec![9]);

        state.set_search_term("no match at all");
        assert!(matches!(state.outcome, PipelineOutcome::Empty(_)));

        state.show_everything();
        assert_eq!(state.outcome.dashboard().unwrap().metrics.total, 12);

        state.reset_filters();
        assert_eq!(state.criteria, FilterCriteria::for_dataset(state.dataset().unwrap(), (2015, 2021)));
        assert!(matches!(state.outcome, PipelineOutcome::Ready(_)));
    }

    #[test]
    fn test_failed_load_drops_previous_dataset() {
        let mut state = state();
        state.load_path(Path::new("/no/such/dir/titles.csv"));
        assert!(state.dataset().is_none());
        assert!(matches!(state.outcome, PipelineOutcome::LoadFailed(ref msg) if msg.contains("opening CSV")));

        // Filter changes keep showing the single load error.
        state.set_search_term("anything");
        assert!(matches!(state.outcome, PipelineOutcome::LoadFailed(_)));
    }
}
