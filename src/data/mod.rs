/// Data layer: records, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  API (.json) / dump (.json / .csv / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse payload → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐        ┌──────────┐
///   │  filter   │ ◀──── │  range    │  mass bounds (lo ≤ hi)
///   └──────────┘        └──────────┘
///        │  subset (source order)
///        ▼
///   ┌───────────┐
///   │ aggregate  │  summary, year bins, class bins
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  table    │  per-record display strings
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod range;
pub mod table;
