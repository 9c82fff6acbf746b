pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod output;
pub mod reports;
