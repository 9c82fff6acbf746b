//! Tabular aggregation engine.
//!
//! Ingested records are summarized into per-group statistics (count, sum,
//! mean, median, min, max, stddev) and numeric values are classified
//! against ordered threshold tables. Every operation is a pure function of
//! its inputs: the engine holds no state and calls are independent.

pub mod bucket;
pub mod classify;
pub mod summarize;
pub mod types;
pub mod utility;

pub use bucket::{TimeBucket, bucket_by_time};
pub use classify::classify;
pub use summarize::{summarize, summarize_required};
pub use types::{ALL_GROUP, Record, SummaryResult, SummaryStats, Value};
