use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// TitleKind – the `type` column
// ---------------------------------------------------------------------------

/// What kind of title a row describes.
///
/// The catalogue only knows movies and TV shows, but unknown values are kept
/// verbatim instead of failing the load; they count towards the total and
/// towards neither of the two buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TitleKind {
    Movie,
    TvShow,
    Other(String),
}

impl TitleKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Movie" => TitleKind::Movie,
            "TV Show" => TitleKind::TvShow,
            other => TitleKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TitleKind::Movie => "Movie",
            TitleKind::TvShow => "TV Show",
            TitleKind::Other(s) => s,
        }
    }
}

impl fmt::Display for TitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TitleRecord – one row of the catalogue
// ---------------------------------------------------------------------------

/// A single title (one row of the source table).
///
/// Missing cells are `None`; only `release_year` is guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRecord {
    pub kind: TitleKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_year: i32,
    /// Comma-separated country list, kept exactly as written in the source.
    pub country: Option<String>,
    /// Comma-separated genre list.
    pub listed_in: Option<String>,
    /// Every other source column, as text. Only used for the preview table.
    pub extra: BTreeMap<String, String>,
}

impl TitleRecord {
    /// Genre tokens of `listed_in`, split on the catalogue's `", "` delimiter.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.listed_in
            .as_deref()
            .into_iter()
            .flat_map(|s| s.split(", "))
            .filter(|g| !g.is_empty())
    }
}

// ---------------------------------------------------------------------------
// TitleDataset – the complete loaded catalogue
// ---------------------------------------------------------------------------

/// The full parsed catalogue with pre-computed indices used by the controls.
///
/// Read-only after construction: filtering produces row indices into
/// `records` and never touches the records themselves.
#[derive(Debug, Clone)]
pub struct TitleDataset {
    pub records: Vec<TitleRecord>,
    /// Names of the non-pipeline columns, in source order.
    pub extra_columns: Vec<String>,
    /// Sorted distinct non-null `country` values.
    pub countries: Vec<String>,
    year_bounds: Option<(i32, i32)>,
}

impl TitleDataset {
    pub fn from_records(records: Vec<TitleRecord>, extra_columns: Vec<String>) -> Self {
        let countries: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.country.as_deref())
            .collect();
        let countries = countries.into_iter().map(str::to_string).collect();

        let year_bounds = records.iter().fold(None, |acc, r| match acc {
            None => Some((r.release_year, r.release_year)),
            Some((lo, hi)) => Some((lo.min(r.release_year), hi.max(r.release_year))),
        });

        TitleDataset {
            records,
            extra_columns,
            countries,
            year_bounds,
        }
    }

    /// Observed `(min, max)` release year, `None` for an empty dataset.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate the records behind a filtered view.
    pub fn rows<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a TitleRecord> + 'a {
        indices.iter().filter_map(|&i| self.records.get(i))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(
        kind: &str,
        title: &str,
        year: i32,
        country: Option<&str>,
        listed_in: Option<&str>,
    ) -> TitleRecord {
        TitleRecord {
            kind: TitleKind::parse(kind),
            title: Some(title.to_string()),
            description: Some(format!("A story about {title}.")),
            release_year: year,
            country: country.map(str::to_string),
            listed_in: listed_in.map(str::to_string),
            extra: BTreeMap::new(),
        }
    }

    /// A small catalogue covering multi-country rows, missing values and
    /// both title kinds.
    pub fn catalogue() -> TitleDataset {
        let mut no_text = record("Movie", "", 2016, Some("Japan"), Some("Anime Features"));
        no_text.title = None;
        no_text.description = None;

        TitleDataset::from_records(
            vec![
                record("Movie", "Dick Johnson Is Dead", 2020, Some("United States"), Some("Documentaries")),
                record("TV Show", "Blood & Water", 2021, Some("South Africa"), Some("International TV Shows, TV Dramas, TV Mysteries")),
                record("TV Show", "Ganglands", 2021, None, Some("Crime TV Shows, International TV Shows, TV Action & Adventure")),
                record("Movie", "Sankofa", 1993, Some("United States, Ghana, Burkina Faso, United Kingdom, Germany, Ethiopia"), Some("Dramas, Independent Movies, International Movies")),
                record("Movie", "The Starling", 2021, Some("United States"), Some("Comedies, Dramas")),
                record("TV Show", "Kota Factory", 2021, Some("India"), Some("International TV Shows, Romantic TV Shows, TV Comedies")),
                record("Movie", "Grown Ups", 2010, Some("United States"), Some("Comedies")),
                record("Movie", "Dark Skies", 2013, Some("United States"), Some("Horror Movies, Sci-Fi & Fantasy")),
                record("Movie", "Paranoia", 2013, Some("United States, India"), Some("Thrillers")),
                record("Movie", "Jaws", 1975, Some("United States"), Some("Action & Adventure, Classic Movies, Dramas")),
                record("TV Show", "Midnight Mass", 2021, None, None),
                no_text,
            ],
            vec![],
        )
    }
}
