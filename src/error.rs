//! Error taxonomy for the aggregation engine.
//!
//! The engine never catches its own errors; it raises them to the caller,
//! which decides whether to skip, log, or abort.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// A record is missing a required field, or the field's value cannot be
    /// coerced to a number.
    #[error("record {index}: field `{field}` is missing or not numeric")]
    MalformedRecord { index: usize, field: String },

    /// The caller demanded a non-empty result from an empty dataset.
    #[error("dataset is empty")]
    EmptyDataset,

    /// The threshold table has no bound covering the value. Callers must
    /// supply a catch-all final bound so every value classifies.
    #[error("no threshold covers value {value}")]
    InvalidThreshold { value: f64 },
}
