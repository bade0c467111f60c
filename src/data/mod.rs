/// Data layer: loading, outlier filtering and timing statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset (frame, angle, t_absolute)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  IQR bounds + no-detection zeros → filtered Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  DeltaSeries → SummaryStats, Histogram
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline │  Analysis { RenderRequest, Report }
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod stats;
