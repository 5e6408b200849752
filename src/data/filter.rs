use std::fmt;

use super::model::{TitleDataset, TitleRecord};

/// Year range the original dashboard opened with.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2015, 2021);

// ---------------------------------------------------------------------------
// Filter criteria: what the user selected in the side panel
// ---------------------------------------------------------------------------

/// Country selector value: the `All` sentinel or one exact `country` field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CountrySelection {
    #[default]
    All,
    Exact(String),
}

impl fmt::Display for CountrySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountrySelection::All => f.write_str("All"),
            CountrySelection::Exact(c) => f.write_str(c),
        }
    }
}

/// The combined selection that drives one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Inclusive on both ends.
    pub year_range: (i32, i32),
    pub country: CountrySelection,
    /// Empty means no keyword filter. Otherwise matched as typed, spaces included.
    pub search_term: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            year_range: DEFAULT_YEAR_RANGE,
            country: CountrySelection::All,
            search_term: String::new(),
        }
    }
}

impl FilterCriteria {
    /// Initial criteria for a freshly loaded dataset: `preferred` clamped into
    /// the observed year bounds, every country, no search.
    pub fn for_dataset(dataset: &TitleDataset, preferred: (i32, i32)) -> Self {
        let mut criteria = FilterCriteria {
            year_range: preferred,
            ..Default::default()
        };
        criteria.clamp_years(dataset);
        criteria
    }

    /// Criteria that keep every row of `dataset`.
    pub fn everything(dataset: &TitleDataset) -> Self {
        FilterCriteria {
            year_range: dataset.year_bounds().unwrap_or(DEFAULT_YEAR_RANGE),
            ..Default::default()
        }
    }

    /// Pull both ends of the year range inside the dataset's observed bounds,
    /// keeping `min <= max`.
    pub fn clamp_years(&mut self, dataset: &TitleDataset) {
        let Some((lo, hi)) = dataset.year_bounds() else {
            return;
        };
        let (mut from, mut to) = self.year_range;
        from = from.clamp(lo, hi);
        to = to.clamp(lo, hi);
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }
        self.year_range = (from, to);
    }

    /// The search term, or `None` when the keyword filter is off.
    pub fn keyword(&self) -> Option<&str> {
        (!self.search_term.is_empty()).then_some(self.search_term.as_str())
    }
}

// ---------------------------------------------------------------------------
// Filter stages
// ---------------------------------------------------------------------------

/// Row indices of a dataset that survive a filter stage.
pub type RowIndices = Vec<usize>;

/// Intermediate and final views of one filter run.
///
/// Each stage derives a fresh index list from the previous one, so
/// `final_filtered ⊆ country_filtered ⊆ year_filtered`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStages {
    /// Year range only. Base of the top-countries ranking.
    pub year_filtered: RowIndices,
    /// Year range and country selection.
    pub country_filtered: RowIndices,
    /// All criteria, including the keyword. This is the display set.
    pub final_filtered: RowIndices,
}

/// Run all three stages over the full dataset.
pub fn apply(dataset: &TitleDataset, criteria: &FilterCriteria) -> FilterStages {
    let all: RowIndices = (0..dataset.len()).collect();
    let year_filtered = by_year(dataset, &all, criteria.year_range);
    let country_filtered = by_country(dataset, &year_filtered, &criteria.country);
    let final_filtered = match criteria.keyword() {
        Some(term) => by_keyword(dataset, &country_filtered, term),
        None => country_filtered.clone(),
    };

    FilterStages {
        year_filtered,
        country_filtered,
        final_filtered,
    }
}

/// Keep rows whose `release_year` lies in `range`, inclusive.
pub fn by_year(dataset: &TitleDataset, rows: &[usize], (from, to): (i32, i32)) -> RowIndices {
    retain(dataset, rows, |r| (from..=to).contains(&r.release_year))
}

/// Keep rows whose whole `country` field equals the selection.
///
/// "India, United States" does not match a selection of "United States":
/// the field is compared as one string, never split into members.
pub fn by_country(dataset: &TitleDataset, rows: &[usize], country: &CountrySelection) -> RowIndices {
    match country {
        CountrySelection::All => rows.to_vec(),
        CountrySelection::Exact(wanted) => {
            retain(dataset, rows, |r| r.country.as_deref() == Some(wanted.as_str()))
        }
    }
}

/// Keep rows whose title or description contains `term`, ignoring case.
/// Missing text never matches.
pub fn by_keyword(dataset: &TitleDataset, rows: &[usize], term: &str) -> RowIndices {
    let needle = term.to_lowercase();
    let matches = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    };
    retain(dataset, rows, |r| matches(&r.title) || matches(&r.description))
}

fn retain(dataset: &TitleDataset, rows: &[usize], keep: impl Fn(&TitleRecord) -> bool) -> RowIndices {
    rows.iter()
        .copied()
        .filter(|&i| dataset.records.get(i).is_some_and(&keep))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{catalogue, record};
    use crate::data::model::TitleDataset;

    fn criteria(year_range: (i32, i32), country: CountrySelection, search: &str) -> FilterCriteria {
        FilterCriteria {
            year_range,
            country,
            search_term: search.to_string(),
        }
    }

    fn is_subset(inner: &[usize], outer: &[usize]) -> bool {
        inner.iter().all(|i| outer.contains(i))
    }

    #[test]
    fn test_everything_keeps_all_rows() {
        let ds = catalogue();
        let stages = apply(&ds, &FilterCriteria::everything(&ds));
        assert_eq!(stages.final_filtered, (0..ds.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let ds = catalogue();
        let stages = apply(&ds, &criteria((2013, 2020), CountrySelection::All, ""));
        let years: Vec<i32> = ds.rows(&stages.final_filtered).map(|r| r.release_year).collect();
        assert_eq!(years, vec![2020, 2013, 2013, 2016]);
    }

    #[test]
    fn test_stages_narrow_monotonically() {
        let ds = catalogue();
        let cases = [
            criteria((1900, 2100), CountrySelection::All, ""),
            criteria((2010, 2021), CountrySelection::Exact("United States".into()), "the"),
            criteria((2021, 2021), CountrySelection::Exact("India".into()), "kota"),
            criteria((1975, 1993), CountrySelection::All, "zzz"),
        ];
        let all: Vec<usize> = (0..ds.len()).collect();
        for c in &cases {
            let s = apply(&ds, c);
            assert!(is_subset(&s.final_filtered, &s.country_filtered), "{c:?}");
            assert!(is_subset(&s.country_filtered, &s.year_filtered), "{c:?}");
            assert!(is_subset(&s.year_filtered, &all), "{c:?}");
        }
    }

    #[test]
    fn test_country_is_exact_field_match() {
        let ds = catalogue();
        let c = criteria((1900, 2100), CountrySelection::Exact("United States".into()), "");
        let stages = apply(&ds, &c);
        let titles: Vec<&str> = ds
            .rows(&stages.final_filtered)
            .filter_map(|r| r.title.as_deref())
            .collect();
        assert_eq!(titles, vec!["Dick Johnson Is Dead", "The Starling", "Grown Ups", "Dark Skies", "Jaws"]);
        // Multi-country rows that mention the selection are excluded.
        assert!(!titles.contains(&"Paranoia"));
        assert!(!titles.contains(&"Sankofa"));
    }

    #[test]
    fn test_unknown_country_yields_nothing() {
        let ds = catalogue();
        let c = criteria((1900, 2100), CountrySelection::Exact("Atlantis".into()), "");
        assert!(apply(&ds, &c).final_filtered.is_empty());
    }

    #[test]
    fn test_keyword_is_case_insensitive_over_title_and_description() {
        let ds = catalogue();
        let all: Vec<usize> = (0..ds.len()).collect();

        let hits = by_keyword(&ds, &all, "GROWN");
        assert_eq!(hits, vec![6]);

        // Matches via the description only.
        let hits = by_keyword(&ds, &all, "story about jaws");
        assert_eq!(hits, vec![9]);
    }

    #[test]
    fn test_keyword_skips_missing_text() {
        let ds = catalogue();
        let all: Vec<usize> = (0..ds.len()).collect();
        // Row 11 has neither title nor description; "a" matches every other row.
        let hits = by_keyword(&ds, &all, "a");
        assert!(!hits.contains(&11));
        assert_eq!(hits.len(), 11);
    }

    #[test]
    fn test_only_empty_search_disables_keyword_stage() {
        let ds = catalogue();
        let stages = apply(&ds, &criteria((1900, 2100), CountrySelection::All, ""));
        assert_eq!(stages.final_filtered, stages.country_filtered);
        assert_eq!(stages.final_filtered.len(), ds.len());

        // A lone space is a real term: row 11 has no text to contain it.
        let stages = apply(&ds, &criteria((1900, 2100), CountrySelection::All, " "));
        assert_eq!(stages.final_filtered.len(), ds.len() - 1);
        assert!(!stages.final_filtered.contains(&11));
    }

    #[test]
    fn test_keyword_keeps_surrounding_spaces() {
        let mut other = record("Movie", "Other", 2000, None, None);
        other.description = None;
        let mut hello = record("Movie", "Hello World", 2000, None, None);
        hello.description = None;
        let ds = TitleDataset::from_records(vec![other, hello], vec![]);
        let all: Vec<usize> = (0..ds.len()).collect();

        assert!(by_keyword(&ds, &all, "the ").is_empty());
        assert_eq!(by_keyword(&ds, &all, " "), vec![1]);
        assert_eq!(by_keyword(&ds, &all, "the"), vec![0]);

        let c = criteria((1900, 2100), CountrySelection::All, "the ");
        assert_eq!(c.keyword(), Some("the "));
        assert!(apply(&ds, &c).final_filtered.is_empty());
    }

    #[test]
    fn test_keyword_is_literal_text() {
        let ds = catalogue();
        let all: Vec<usize> = (0..ds.len()).collect();
        assert_eq!(by_keyword(&ds, &all, "blood & water"), vec![1]);
        assert!(by_keyword(&ds, &all, "g.*s").is_empty());
    }

    #[test]
    fn test_for_dataset_clamps_default_range() {
        let ds = catalogue();
        let c = FilterCriteria::for_dataset(&ds, DEFAULT_YEAR_RANGE);
        assert_eq!(c.year_range, (2015, 2021));

        let c = FilterCriteria::for_dataset(&ds, (1800, 2050));
        assert_eq!(c.year_range, (1975, 2021));

        let c = FilterCriteria::for_dataset(&ds, (2030, 1700));
        assert_eq!(c.year_range, (1975, 2021));
        assert_eq!(c.country, CountrySelection::All);
        assert_eq!(c.keyword(), None);
    }

    #[test]
    fn test_filtering_leaves_dataset_untouched() {
        let ds = catalogue();
        let before = ds.records.clone();
        let _ = apply(&ds, &criteria((2000, 2021), CountrySelection::Exact("India".into()), "kota"));
        assert_eq!(ds.records, before);
    }
}
