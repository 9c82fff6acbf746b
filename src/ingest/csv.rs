use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fs;
use tracing::{debug, error, warn};

use crate::engine::{Record, Value};
use crate::ingest::RecordSource;

/// Reads a two-column `name,score` CSV (no header) into records with
/// `name` and `score` fields.
///
/// Rows with the wrong column count or a non-numeric score are skipped
/// with a warning; they never reach the engine.
pub fn read_named_scores(path: &str) -> Result<Vec<Record>> {
    let file = fs::File::open(path)?;
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();

    for (row_number, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(path, row = row_number, error = %e, "Skipping unreadable row");
                continue;
            }
        };

        if row.len() != 2 {
            warn!(
                path,
                row = row_number,
                columns = row.len(),
                "Skipping row with wrong column count"
            );
            continue;
        }

        let name = row[0].trim().to_string();
        let score: f64 = match row[1].trim().parse() {
            Ok(score) => score,
            Err(_) => {
                warn!(path, row = row_number, value = &row[1], "Skipping row with non-numeric score");
                continue;
            }
        };

        records.push(Record::new(vec![
            ("name".to_string(), Value::Str(name)),
            ("score".to_string(), Value::Num(score)),
        ]));
    }

    debug!(path, count = records.len(), "Score CSV ingested");
    Ok(records)
}

/// Reads a header-driven multi-column CSV, coercing each cell best-effort
/// to a timestamp, a float, or a string.
pub fn read_table(path: &str) -> Result<Vec<Record>> {
    let file = fs::File::open(path)?;
    let mut reader = ::csv::Reader::from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut records = Vec::new();

    for (row_number, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(path, row = row_number, error = %e, "Skipping unreadable row");
                continue;
            }
        };

        if row.len() != headers.len() {
            warn!(
                path,
                row = row_number,
                columns = row.len(),
                expected = headers.len(),
                "Skipping row with wrong column count"
            );
            continue;
        }

        let fields = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.trim().is_empty())
            .map(|(header, cell)| (header.clone(), parse_cell(cell)))
            .collect();

        records.push(Record::new(fields));
    }

    debug!(path, count = records.len(), "Table CSV ingested");
    Ok(records)
}

/// Reads every `*.csv` under `dir` with [`read_table`], tagging each record
/// with a `tag_field` derived from the file stem (e.g. `library.csv` tags
/// its rows with `building = "library"`).
///
/// Unreadable files are logged and skipped so one bad file cannot abort
/// the whole ingestion.
pub fn read_table_dir(dir: &str, tag_field: &str) -> Result<Vec<Record>> {
    let mut combined = Vec::new();

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("csv"))
        .collect();
    paths.sort();

    for path in paths {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let path_str = path.to_string_lossy().to_string();
        match read_table(&path_str) {
            Ok(records) => {
                for record in records {
                    combined.push(record.with_field(tag_field, Value::Str(stem.clone())));
                }
            }
            Err(e) => {
                error!(path = %path_str, error = %e, "Failed to read CSV, skipping file");
            }
        }
    }

    Ok(combined)
}

/// Coerces one CSV cell: RFC 3339 or `%Y-%m-%d [%H:%M:%S]` timestamps,
/// then floats, then plain text.
fn parse_cell(cell: &str) -> Value {
    let cell = cell.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(cell) {
        return Value::Time(ts.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S") {
        return Value::Time(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
        return Value::Time(date.and_hms_opt(0, 0, 0).unwrap().and_utc());
    }
    if let Ok(n) = cell.parse::<f64>() {
        return Value::Num(n);
    }

    Value::Str(cell.to_string())
}

/// A two-column `name,score` CSV file as a record source.
pub struct ScoreCsv {
    path: String,
}

impl ScoreCsv {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl RecordSource for ScoreCsv {
    fn records(&mut self) -> Result<Vec<Record>> {
        read_named_scores(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_read_named_scores_skips_bad_rows() {
        let path = temp_path("table_rater_test_scores.csv");
        fs::write(&path, "Alice,95\nBob,sixty\nCarol,38\nlonely_cell\n").unwrap();

        let records = read_named_scores(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some(&Value::Str("Alice".into())));
        assert_eq!(records[1].get("score"), Some(&Value::Num(38.0)));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_table_coerces_cells() {
        let path = temp_path("table_rater_test_table.csv");
        fs::write(
            &path,
            "date,temperature,city\n2025-03-14,21.5,Pune\n2025-03-15,19.0,Pune\n",
        )
        .unwrap();

        let records = read_table(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(records[0].get("date"), Some(Value::Time(_))));
        assert_eq!(records[0].get("temperature"), Some(&Value::Num(21.5)));
        assert_eq!(records[0].get("city"), Some(&Value::Str("Pune".into())));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_table_drops_empty_cells() {
        let path = temp_path("table_rater_test_blank.csv");
        fs::write(&path, "date,temperature,humidity\n2025-03-14,21.5,\n").unwrap();

        let records = read_table(&path).unwrap();
        assert_eq!(records[0].get("humidity"), None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_table_dir_tags_building() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("library.csv"),
            "timestamp,kwh\n2025-01-05 10:00:00,3.5\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("gym.csv"),
            "timestamp,kwh\n2025-01-05 10:00:00,7.0\n",
        )
        .unwrap();

        let records = read_table_dir(dir.path().to_str().unwrap(), "building").unwrap();
        assert_eq!(records.len(), 2);

        let mut buildings: Vec<_> = records
            .iter()
            .map(|r| r.get("building").unwrap().render())
            .collect();
        buildings.sort();
        assert_eq!(buildings, vec!["gym", "library"]);
    }

    #[test]
    fn test_parse_cell_variants() {
        assert!(matches!(parse_cell("2025-03-14"), Value::Time(_)));
        assert!(matches!(parse_cell("2025-03-14 08:30:00"), Value::Time(_)));
        assert_eq!(parse_cell("42.5"), Value::Num(42.5));
        assert_eq!(parse_cell("hello"), Value::Str("hello".to_string()));
    }
}
