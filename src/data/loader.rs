use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{TitleDataset, TitleKind, TitleRecord};

/// Columns the pipeline reads. Anything else is carried along for display.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "type",
    "title",
    "description",
    "release_year",
    "country",
    "listed_in",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a title catalogue from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one title per row (the usual `netflix_titles.csv`)
/// * `.json`    – `[{ "type": "Movie", "title": ..., ... }, ...]`
/// * `.parquet` – one column per field, written by Pandas or Polars
///
/// A dataset without rows is rejected: the controls need observed year bounds.
pub fn load_file(path: &Path) -> Result<TitleDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if dataset.is_empty() {
        bail!("{} contains no titles", path.display());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Shared row handling
// ---------------------------------------------------------------------------

/// Cells of one source row as text, `None` for null / empty.
type RawRow = BTreeMap<String, Option<String>>;

fn check_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>> {
    let columns: Vec<&str> = columns.into_iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !columns.contains(c))
        .collect();
    if !missing.is_empty() {
        bail!("missing required column(s): {}", missing.join(", "));
    }
    Ok(columns
        .into_iter()
        .filter(|c| !REQUIRED_COLUMNS.contains(c))
        .map(str::to_string)
        .collect())
}

fn build_record(row: usize, mut cells: RawRow) -> Result<TitleRecord> {
    let mut take = |col: &str| cells.remove(col).flatten();

    let year_text = take("release_year")
        .with_context(|| format!("Row {row}: 'release_year' is empty"))?;
    let release_year = parse_year(&year_text)
        .with_context(|| format!("Row {row}: 'release_year' is not a year: '{year_text}'"))?;

    let record = TitleRecord {
        kind: TitleKind::parse(take("type").as_deref().unwrap_or("")),
        title: take("title"),
        description: take("description"),
        release_year,
        country: take("country"),
        listed_in: take("listed_in"),
        extra: BTreeMap::new(),
    };

    let extra = cells
        .into_iter()
        .filter_map(|(col, val)| val.map(|v| (col, v)))
        .collect();
    Ok(TitleRecord { extra, ..record })
}

/// Accepts `2019` as well as float renderings such as `2019.0`.
fn parse_year(s: &str) -> Result<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Ok(y);
    }
    let f: f64 = s.parse()?;
    if f.fract() != 0.0 || f < i32::MIN as f64 || f > i32::MAX as f64 {
        bail!("{f} is not a whole year");
    }
    Ok(f as i32)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Cell texts a CSV export uses for a missing value (the pandas defaults).
const CSV_NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn csv_cell(s: &str) -> Option<String> {
    (!CSV_NA_TOKENS.contains(&s)).then(|| s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. Empty cells and the usual NA
/// spellings (`NaN`, `NA`, `NULL`, ...) are missing values.
/// Quoted fields may contain commas (`"India, United States"`).
fn load_csv(path: &Path) -> Result<TitleDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let extra_columns = check_columns(headers.iter().map(String::as_str))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).and_then(csv_cell)))
            .collect();
        records.push(build_record(row_no, cells)?);
    }

    Ok(TitleDataset::from_records(records, extra_columns))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "type": "Movie", "title": "Jaws", "release_year": 1975, "country": null, ... },
///   ...
/// ]
/// ```
///
/// A key absent from one record is treated as null for that record.
fn load_json(path: &Path) -> Result<TitleDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<&str> = Vec::new();
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }
    let extra_columns = check_columns(columns.iter().copied())?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let cells: RawRow = columns
            .iter()
            .map(|&col| (col.to_string(), obj.get(col).and_then(json_to_text)))
            .collect();
        records.push(build_record(i, cells)?);
    }

    Ok(TitleDataset::from_records(records, extra_columns))
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => non_empty(s),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// String columns may be Utf8 or LargeUtf8; `release_year` may be any
/// integer or float column. Other columns are rendered to text for the
/// preview table.
fn load_parquet(path: &Path) -> Result<TitleDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let extra_columns = check_columns(column_names.iter().map(String::as_str))?;

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let mut cells = RawRow::new();
            for (col_idx, col_name) in column_names.iter().enumerate() {
                let col = batch.column(col_idx);
                let value = if col.is_null(row) {
                    None
                } else {
                    let text = array_value_to_string(col, row)
                        .with_context(|| format!("Row {row_no}: failed to read '{col_name}'"))?;
                    non_empty(&text)
                };
                cells.insert(col_name.clone(), value);
            }
            records.push(build_record(row_no, cells)?);
        }
    }

    Ok(TitleDataset::from_records(records, extra_columns))
}
