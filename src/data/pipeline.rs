use thiserror::Error;

use super::aggregate::{self, Metrics, Ranking, TOP_COUNTRIES, TOP_GENRES};
use super::filter::{self, CountrySelection, FilterCriteria, RowIndices};
use super::model::TitleDataset;

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Result of the one-time dataset load, as seen by the pipeline.
#[derive(Debug, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded(TitleDataset),
    /// Rendered error chain of the failed load.
    Failed(String),
}

impl LoadState {
    pub fn dataset(&self) -> Option<&TitleDataset> {
        match self {
            LoadState::Loaded(ds) => Some(ds),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("year range is inverted: {from} > {to}")]
    InvertedYearRange { from: i32, to: i32 },
}

/// Everything the dashboard renders for one criteria value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub criteria: FilterCriteria,
    /// The display set.
    pub rows: RowIndices,
    pub metrics: Metrics,
    pub year_trend: Vec<(i32, usize)>,
    /// Ranked over the year-filtered rows, independent of the country selection.
    pub top_countries: Ranking,
    pub genres: Ranking,
}

impl Dashboard {
    /// The zeroed dashboard behind the empty-result notice.
    fn empty(criteria: &FilterCriteria) -> Self {
        Dashboard {
            criteria: criteria.clone(),
            rows: Vec::new(),
            metrics: Metrics::default(),
            year_trend: Vec::new(),
            top_countries: Vec::new(),
            genres: Vec::new(),
        }
    }

    /// The first `n` rows of the display set.
    pub fn preview(&self, n: usize) -> &[usize] {
        &self.rows[..self.rows.len().min(n)]
    }

    /// Heading for a concrete country selection.
    pub fn country_heading(&self) -> Option<String> {
        match &self.criteria.country {
            CountrySelection::All => None,
            CountrySelection::Exact(c) => Some(format!("{c}: detailed results")),
        }
    }
}

/// What the rendering layer has to show, matched exhaustively by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineOutcome {
    #[default]
    NotLoaded,
    LoadFailed(String),
    Failed(PipelineError),
    /// Nothing matched. Metrics are zero and all series are empty.
    Empty(Dashboard),
    Ready(Dashboard),
}

impl PipelineOutcome {
    pub fn dashboard(&self) -> Option<&Dashboard> {
        match self {
            PipelineOutcome::Empty(d) | PipelineOutcome::Ready(d) => Some(d),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run the filter stages and aggregates for `criteria`.
///
/// Pure: the dataset is only read, and every call recomputes from scratch.
pub fn evaluate(load: &LoadState, criteria: &FilterCriteria) -> PipelineOutcome {
    let dataset = match load {
        LoadState::NotLoaded => return PipelineOutcome::NotLoaded,
        LoadState::Failed(msg) => return PipelineOutcome::LoadFailed(msg.clone()),
        LoadState::Loaded(ds) => ds,
    };

    match build_dashboard(dataset, criteria) {
        Ok(d) if d.rows.is_empty() => PipelineOutcome::Empty(Dashboard::empty(criteria)),
        Ok(d) => PipelineOutcome::Ready(d),
        Err(e) => {
            log::warn!("Pipeline rejected criteria {criteria:?}: {e}");
            PipelineOutcome::Failed(e)
        }
    }
}

fn build_dashboard(dataset: &TitleDataset, criteria: &FilterCriteria) -> Result<Dashboard, PipelineError> {
    let (from, to) = criteria.year_range;
    if from > to {
        return Err(PipelineError::InvertedYearRange { from, to });
    }

    let stages = filter::apply(dataset, criteria);
    log::debug!(
        "Filtered {} rows: {} by year, {} by country, {} by keyword",
        dataset.len(),
        stages.year_filtered.len(),
        stages.country_filtered.len(),
        stages.final_filtered.len()
    );

    let rows = &stages.final_filtered;
    Ok(Dashboard {
        criteria: criteria.clone(),
        metrics: Metrics::compute(dataset, rows),
        year_trend: aggregate::year_trend(dataset, rows),
        top_countries: aggregate::top_countries(dataset, &stages.year_filtered, TOP_COUNTRIES),
        genres: aggregate::genre_distribution(dataset, rows, TOP_GENRES),
        rows: stages.final_filtered,
    })
}
