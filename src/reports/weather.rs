use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::engine::{
    ALL_GROUP, Record, SummaryResult, TimeBucket, Value, bucket_by_time, summarize,
    summarize_required, utility,
};
use crate::ingest::read_table;

/// Cleans a raw weather dataset the way the exploratory script did:
/// records missing `date` or `temperature` are dropped, missing `humidity`
/// is filled with the mean of the present values, missing `rainfall` is
/// filled with 0.
pub fn clean(dataset: &[Record]) -> Vec<Record> {
    let kept: Vec<&Record> = dataset
        .iter()
        .filter(|record| {
            let has_date = matches!(record.get("date"), Some(Value::Time(_)));
            let has_temp = record
                .get("temperature")
                .and_then(Value::as_f64)
                .is_some();
            if !has_date || !has_temp {
                warn!("Dropping record missing date or temperature");
            }
            has_date && has_temp
        })
        .collect();

    let humidity_present: Vec<f64> = kept
        .iter()
        .filter_map(|record| record.get("humidity").and_then(Value::as_f64))
        .collect();
    let humidity_fill = utility::mean(&humidity_present);

    kept.into_iter()
        .map(|record| {
            let mut record = record.clone();
            if record.get("humidity").and_then(Value::as_f64).is_none() {
                record = record.with_field("humidity", Value::Num(humidity_fill));
            }
            if record.get("rainfall").and_then(Value::as_f64).is_none() {
                record = record.with_field("rainfall", Value::Num(0.0));
            }
            record
        })
        .collect()
}

/// Date range of a cleaned dataset, as `YYYY-MM-DD` strings.
fn date_range(dataset: &[Record]) -> Option<(String, String)> {
    let mut dates: Vec<_> = dataset
        .iter()
        .filter_map(|record| match record.get("date") {
            Some(Value::Time(ts)) => Some(*ts),
            _ => None,
        })
        .collect();
    dates.sort();

    let first = dates.first()?;
    let last = dates.last()?;
    Some((
        first.format("%Y-%m-%d").to_string(),
        last.format("%Y-%m-%d").to_string(),
    ))
}

/// Renders the markdown narrative report from a cleaned dataset.
pub fn render_report(dataset: &[Record]) -> Result<String> {
    let temperature = summarize_required(dataset, "temperature", None)?;
    let temperature = temperature
        .get(ALL_GROUP)
        .context("missing temperature summary")?;
    let rainfall = summarize_required(dataset, "rainfall", None)?;
    let rainfall = rainfall.get(ALL_GROUP).context("missing rainfall summary")?;
    let humidity = summarize_required(dataset, "humidity", None)?;
    let humidity = humidity.get(ALL_GROUP).context("missing humidity summary")?;

    let (from, to) = date_range(dataset).context("dataset has no dated records")?;

    let monthly = periodic_section(
        "Monthly Summary",
        &monthly_summary(dataset, "temperature")?,
        &monthly_summary(dataset, "rainfall")?,
        &monthly_summary(dataset, "humidity")?,
    );
    let yearly = periodic_section(
        "Yearly Summary",
        &yearly_summary(dataset, "temperature")?,
        &yearly_summary(dataset, "rainfall")?,
        &yearly_summary(dataset, "humidity")?,
    );

    Ok(format!(
        "# WEATHER DATA ANALYSIS REPORT\n\
         \n\
         ## Dataset Overview\n\
         - Total records: {count}\n\
         - Date range: {from} to {to}\n\
         \n\
         ## Temperature\n\
         - Average: {t_mean:.2}\n\
         - Range: {t_min:.2} to {t_max:.2}\n\
         - Std dev: {t_sd:.2}\n\
         \n\
         ## Rainfall\n\
         - Total: {r_sum:.2}\n\
         - Average: {r_mean:.2}\n\
         - Maximum: {r_max:.2}\n\
         \n\
         ## Humidity\n\
         - Average: {h_mean:.2}\n\
         - Range: {h_min:.2} to {h_max:.2}\n\
         \n\
         {monthly}\
         \n\
         {yearly}",
        count = temperature.count,
        from = from,
        to = to,
        t_mean = temperature.mean,
        t_min = temperature.min,
        t_max = temperature.max,
        t_sd = temperature.stddev,
        r_sum = rainfall.sum,
        r_mean = rainfall.mean,
        r_max = rainfall.max,
        h_mean = humidity.mean,
        h_min = humidity.min,
        h_max = humidity.max,
    ))
}

/// Statistics for `metric` bucketed per month (`YYYY-MM` keys, first-seen
/// order).
pub fn monthly_summary(dataset: &[Record], metric: &str) -> Result<SummaryResult> {
    let tagged = bucket_by_time(dataset, "date", TimeBucket::Month, "month")?;
    Ok(summarize(&tagged, metric, Some("month"))?)
}

/// Statistics for `metric` bucketed per year.
pub fn yearly_summary(dataset: &[Record], metric: &str) -> Result<SummaryResult> {
    let tagged = bucket_by_time(dataset, "date", TimeBucket::Year, "year")?;
    Ok(summarize(&tagged, metric, Some("year"))?)
}

/// Renders one per-period section: temperature mean/range, rainfall total,
/// and mean humidity for each bucket.
fn periodic_section(
    title: &str,
    temperature: &SummaryResult,
    rainfall: &SummaryResult,
    humidity: &SummaryResult,
) -> String {
    let mut section = format!("## {title}\n");
    for (period, temp) in temperature.iter() {
        let rain_total = rainfall.get(period).map(|s| s.sum).unwrap_or(0.0);
        let mean_humidity = humidity.get(period).map(|s| s.mean).unwrap_or(0.0);
        section.push_str(&format!(
            "- {period}: temperature {:.2} ({:.2} to {:.2}), rainfall total {:.2}, humidity {:.2}\n",
            temp.mean, temp.min, temp.max, rain_total, mean_humidity
        ));
    }
    section
}

const CLEANED_COLUMNS: [&str; 4] = ["date", "temperature", "rainfall", "humidity"];

/// Exports the cleaned dataset as CSV with a fixed column order.
fn write_cleaned_csv(path: &str, dataset: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CLEANED_COLUMNS)?;

    for record in dataset {
        let row: Vec<String> = CLEANED_COLUMNS
            .iter()
            .map(|column| {
                record
                    .get(column)
                    .map(Value::render)
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!(path, rows = dataset.len(), "Cleaned weather CSV written");
    Ok(())
}

/// Runs the weather workflow: load, clean, export the cleaned data, and
/// write the markdown report.
pub fn run(input: &str, cleaned_path: &str, report_path: &str) -> Result<()> {
    let raw = read_table(input)?;
    info!(input, records = raw.len(), "Weather data loaded");

    let dataset = clean(&raw);
    info!(
        kept = dataset.len(),
        dropped = raw.len() - dataset.len(),
        "Weather data cleaned"
    );

    write_cleaned_csv(cleaned_path, &dataset)?;

    let monthly = monthly_summary(&dataset, "temperature")?;
    for (month, stats) in monthly.iter() {
        info!(
            month,
            mean = stats.mean,
            min = stats.min,
            max = stats.max,
            "Monthly temperature"
        );
    }

    let report = render_report(&dataset)?;
    std::fs::write(report_path, &report)?;
    info!(report_path, "Weather report written");

    Ok(())
}
