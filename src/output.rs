//! Output formatting and persistence for summaries and graded results.
//!
//! Supports console tables, JSON logging, CSV append, and the fixed
//! `Name,Marks,Grade,Status` results schema.

use anyhow::Result;
use serde::{Deserialize, Serialize, Serializer};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::engine::types::format_num;
use crate::engine::{SummaryResult, SummaryStats};
use csv::WriterBuilder;

/// One graded row of the results CSV. The column set
/// `Name,Marks,Grade,Status` is a fixed contract consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Marks", serialize_with = "marks_as_plain_number")]
    pub marks: f64,
    #[serde(rename = "Grade")]
    pub grade: String,
    #[serde(rename = "Status")]
    pub status: String,
}

// Whole-number marks are written without a trailing `.0`, as the original
// tables were.
fn marks_as_plain_number<S: Serializer>(marks: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_num(*marks))
}

/// Writes graded rows to `path` under the fixed results schema,
/// replacing any previous file.
pub fn write_results_csv(path: &str, rows: &[ResultRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path, rows = rows.len(), "Results CSV written");
    Ok(())
}

/// Re-parses a results CSV written by [`write_results_csv`].
pub fn read_results_csv(path: &str) -> Result<Vec<ResultRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// One group's statistics flattened for CSV export.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    group: &'a str,
    count: usize,
    sum: f64,
    mean: f64,
    median: f64,
    min: f64,
    max: f64,
}

/// Writes a [`SummaryResult`] as CSV, one row per group. The group column
/// is named after the key that produced the partition (`building`,
/// `month`, ...).
pub fn write_summary_csv(path: &str, group_column: &str, summary: &SummaryResult) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;

    writer.write_record([
        group_column,
        "count",
        "sum",
        "mean",
        "median",
        "min",
        "max",
    ])?;
    for (group, stats) in summary.iter() {
        writer.serialize(SummaryRow {
            group,
            count: stats.count,
            sum: stats.sum,
            mean: stats.mean,
            median: stats.median,
            min: stats.min,
            max: stats.max,
        })?;
    }
    writer.flush()?;

    info!(path, groups = summary.len(), "Summary CSV written");
    Ok(())
}

/// Appends one serializable row to a CSV file, writing the header only
/// when the file is first created.
pub fn append_record<T: Serialize>(path: &str, row: &T) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

/// Prints the graded results table the way the console tool renders it.
pub fn print_results_table(rows: &[ResultRow]) {
    println!("Name\tMarks\tGrade\tStatus");
    println!("------------------------------");
    for row in rows {
        println!(
            "{}\t{}\t{}\t{}",
            row.name,
            format_num(row.marks),
            row.grade,
            row.status
        );
    }
}

/// Prints the statistics block for one partition.
pub fn print_stats(label: &str, stats: &SummaryStats) {
    println!("{} statistics:", label);
    println!("  Count:   {}", stats.count);
    println!("  Average: {:.2}", stats.mean);
    println!("  Median:  {}", format_num(stats.median));
    println!("  Highest: {}", format_num(stats.max));
    println!("  Lowest:  {}", format_num(stats.min));
}

/// Logs a summary as pretty-printed JSON.
pub fn print_json(summary: &SummaryResult) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
