/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TitleDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ TitleDataset  │  Vec<TitleRecord>, year bounds, country list
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year → country → keyword, each stage → new row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  metrics, year trend, top countries, genres
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  criteria → PipelineOutcome for the UI
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
