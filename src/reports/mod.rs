//! Report workflows built on the aggregation engine.
//!
//! Each workflow loads a dataset through the ingestion layer, runs the
//! engine, and writes its artifacts: the gradebook results CSV, the
//! weather markdown report, and the energy summary files.

pub mod energy;
pub mod gradebook;
pub mod weather;
