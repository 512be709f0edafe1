/// Data layer: core types, loading, and the inflation-rate transform.
///
/// Architecture:
/// ```text
///  ONS CSV (download, cache or local file)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV, clean labels → CpihDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ CpihDataset  │  Vec<Observation>, category index
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   rate    │  per category: month-aligned year-over-year change
///   └──────────┘
/// ```

pub mod labels;
pub mod loader;
pub mod model;
pub mod rate;
