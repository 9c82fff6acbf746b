use anyhow::Result;

use crate::engine::Record;

/// Anything that can produce a dataset for the aggregation engine.
pub trait RecordSource {
    fn records(&mut self) -> Result<Vec<Record>>;
}
