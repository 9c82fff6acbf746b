//! Dataset ingestion: CSV files, CSV directories, and interactive entry.
//!
//! Malformed rows are skipped with a warning before they reach the
//! aggregation engine; the engine assumes clean input. A missing or
//! unreadable file never aborts a run, the caller proceeds with whatever
//! valid records were collected.

mod csv;
mod interactive;
mod source;

pub use csv::{ScoreCsv, read_named_scores, read_table, read_table_dir};
pub use interactive::{InteractivePrompt, read_interactive_scores};
pub use source::RecordSource;
