use std::collections::{BTreeMap, HashMap};

use super::model::{TitleDataset, TitleKind};

/// How many countries the ranking chart shows.
pub const TOP_COUNTRIES: usize = 10;
/// How many genres the distribution chart shows.
pub const TOP_GENRES: usize = 8;

/// Label → count, sorted by descending count.
pub type Ranking = Vec<(String, usize)>;

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub total: usize,
    pub movies: usize,
    pub tv_shows: usize,
}

impl Metrics {
    pub fn compute(dataset: &TitleDataset, rows: &[usize]) -> Self {
        dataset.rows(rows).fold(Metrics::default(), |mut m, r| {
            m.total += 1;
            match r.kind {
                TitleKind::Movie => m.movies += 1,
                TitleKind::TvShow => m.tv_shows += 1,
                TitleKind::Other(_) => {}
            }
            m
        })
    }

    /// One-line insight shown above the charts.
    pub fn summary(&self) -> String {
        format!(
            "{} titles match the current selection, {} of them movies and {} TV shows.",
            self.total, self.movies, self.tv_shows
        )
    }
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// Titles per release year, ascending by year.
pub fn year_trend(dataset: &TitleDataset, rows: &[usize]) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for r in dataset.rows(rows) {
        *counts.entry(r.release_year).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// The `limit` most frequent `country` field values. Multi-country strings
/// are counted as-is; rows without a country are ignored.
pub fn top_countries(dataset: &TitleDataset, rows: &[usize], limit: usize) -> Ranking {
    top_n(
        dataset.rows(rows).filter_map(|r| r.country.as_deref()),
        limit,
    )
}

/// The `limit` most frequent genres. A row listing several genres counts
/// once towards each of them.
pub fn genre_distribution(dataset: &TitleDataset, rows: &[usize], limit: usize) -> Ranking {
    top_n(dataset.rows(rows).flat_map(|r| r.genres()), limit)
}

/// Count labels, sort by count descending (ties by label) and truncate.
fn top_n<'a>(labels: impl Iterator<Item = &'a str>, limit: usize) -> Ranking {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut ranking: Vec<(&str, usize)> = counts.into_iter().collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranking
        .into_iter()
        .take(limit)
        .map(|(label, n)| (label.to_string(), n))
        .collect()
}
