use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::info;

use crate::engine::{
    Record, SummaryResult, TimeBucket, Value, bucket_by_time, summarize, summarize_required,
};
use crate::ingest::read_table_dir;
use crate::output::{print_json, write_summary_csv};

/// Per-building consumption statistics over the combined dataset.
pub fn building_summary(dataset: &[Record]) -> Result<SummaryResult> {
    Ok(summarize_required(dataset, "kwh", Some("building"))?)
}

/// Total consumption per calendar day.
pub fn daily_totals(dataset: &[Record]) -> Result<SummaryResult> {
    let tagged = bucket_by_time(dataset, "timestamp", TimeBucket::Day, "day")?;
    Ok(summarize(&tagged, "kwh", Some("day"))?)
}

/// Total consumption per ISO week.
pub fn weekly_totals(dataset: &[Record]) -> Result<SummaryResult> {
    let tagged = bucket_by_time(dataset, "timestamp", TimeBucket::Week, "week")?;
    Ok(summarize(&tagged, "kwh", Some("week"))?)
}

/// Timestamp of the single highest meter reading. Ties keep the earliest
/// occurrence in the dataset.
pub fn peak_load_time(dataset: &[Record]) -> Option<String> {
    let mut peak: Option<(f64, DateTime<Utc>)> = None;

    for record in dataset {
        let Some(kwh) = record.get("kwh").and_then(Value::as_f64) else {
            continue;
        };
        let ts = match record.get("timestamp") {
            Some(Value::Time(ts)) => *ts,
            _ => continue,
        };
        if peak.is_none_or(|(best, _)| kwh > best) {
            peak = Some((kwh, ts));
        }
    }

    peak.map(|(_, ts)| ts.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Renders the executive summary text file.
fn render_summary(buildings: &SummaryResult, dataset: &[Record]) -> Result<String> {
    let total: f64 = buildings.iter().map(|(_, stats)| stats.sum).sum();

    let (top_building, top_stats) = buildings
        .iter()
        .max_by(|(_, a), (_, b)| a.sum.total_cmp(&b.sum))
        .context("no buildings in summary")?;

    let peak = peak_load_time(dataset).context("no dated meter readings")?;

    Ok(format!(
        "Total campus consumption: {:.2} kWh\n\
         Highest-consuming building: {} ({:.2} kWh)\n\
         Peak load time: {}\n\
         Daily and weekly trends: see the attached CSV files.\n",
        total, top_building, top_stats.sum, peak
    ))
}

/// Runs the energy workflow: ingest every building CSV under `data_dir`,
/// compute building-wise and time-bucketed summaries, and write the
/// summary CSVs plus `summary.txt` under `out_dir`.
pub fn run(data_dir: &str, out_dir: &str) -> Result<()> {
    let dataset = read_table_dir(data_dir, "building")?;
    info!(data_dir, readings = dataset.len(), "Meter data loaded");

    std::fs::create_dir_all(out_dir)?;
    let out = |name: &str| Path::new(out_dir).join(name).to_string_lossy().to_string();

    let buildings = building_summary(&dataset)?;
    print_json(&buildings)?;
    write_summary_csv(&out("building_summary.csv"), "building", &buildings)?;

    let daily = daily_totals(&dataset)?;
    write_summary_csv(&out("daily_totals.csv"), "day", &daily)?;

    let weekly = weekly_totals(&dataset)?;
    write_summary_csv(&out("weekly_totals.csv"), "week", &weekly)?;

    let summary = render_summary(&buildings, &dataset)?;
    std::fs::write(out("summary.txt"), &summary)?;

    info!(
        out_dir,
        buildings = buildings.len(),
        "Energy summary written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(building: &str, day: u32, hour: u32, kwh: f64) -> Record {
        Record::new(vec![
            (
                "timestamp".to_string(),
                Value::Time(Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()),
            ),
            ("kwh".to_string(), Value::Num(kwh)),
            ("building".to_string(), Value::Str(building.to_string())),
        ])
    }

    fn campus() -> Vec<Record> {
        vec![
            reading("library", 6, 9, 3.0),
            reading("library", 6, 18, 5.0),
            reading("gym", 6, 9, 7.0),
            reading("gym", 13, 9, 2.0),
        ]
    }

    #[test]
    fn test_building_summary_sums() {
        let buildings = building_summary(&campus()).unwrap();
        assert_eq!(buildings.get("library").unwrap().sum, 8.0);
        assert_eq!(buildings.get("gym").unwrap().sum, 9.0);
    }

    #[test]
    fn test_daily_and_weekly_totals() {
        let daily = daily_totals(&campus()).unwrap();
        assert_eq!(daily.get("2025-01-06").unwrap().sum, 15.0);
        assert_eq!(daily.get("2025-01-13").unwrap().sum, 2.0);

        let weekly = weekly_totals(&campus()).unwrap();
        assert_eq!(weekly.get("2025-W02").unwrap().sum, 15.0);
        assert_eq!(weekly.get("2025-W03").unwrap().sum, 2.0);
    }

    #[test]
    fn test_peak_load_time() {
        assert_eq!(
            peak_load_time(&campus()).unwrap(),
            "2025-01-06 09:00:00".to_string()
        );
    }

    #[test]
    fn test_peak_load_time_tie_keeps_first_occurrence() {
        let dataset = vec![
            reading("library", 6, 9, 7.0),
            reading("gym", 7, 18, 7.0),
        ];

        assert_eq!(
            peak_load_time(&dataset).unwrap(),
            "2025-01-06 09:00:00".to_string()
        );
    }

    #[test]
    fn test_render_summary() {
        let dataset = campus();
        let buildings = building_summary(&dataset).unwrap();
        let summary = render_summary(&buildings, &dataset).unwrap();

        assert!(summary.contains("Total campus consumption: 17.00 kWh"));
        assert!(summary.contains("Highest-consuming building: gym (9.00 kWh)"));
        assert!(summary.contains("Peak load time: 2025-01-06 09:00:00"));
    }

    #[test]
    fn test_empty_campus_is_an_error() {
        assert!(building_summary(&[]).is_err());
    }
}
