/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  URL / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Dataset (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<ElectricityRecord>, year bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range / state → averages, detail rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  detail rows → .csv / .json
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
