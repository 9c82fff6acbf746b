use crate::engine::types::{ALL_GROUP, Record, SummaryResult, SummaryStats, Value};
use crate::engine::utility::{mean, median, stddev};
use crate::error::EngineError;

/// Computes summary statistics over `dataset`, optionally partitioned by
/// the value of the `group_key` field.
///
/// Partitions preserve first-seen order. When `group_key` is `None` the
/// whole dataset forms a single partition under the [`ALL_GROUP`] key.
/// An empty dataset yields an empty [`SummaryResult`], not an error.
///
/// # Errors
///
/// Returns [`EngineError::MalformedRecord`] when a record lacks the metric
/// or group field, or the metric value is not numeric-coercible. Malformed
/// records are surfaced rather than coerced to zero so they cannot corrupt
/// the statistics.
pub fn summarize(
    dataset: &[Record],
    metric: &str,
    group_key: Option<&str>,
) -> Result<SummaryResult, EngineError> {
    let mut order: Vec<String> = Vec::new();
    let mut series: Vec<Vec<f64>> = Vec::new();

    for (index, record) in dataset.iter().enumerate() {
        let value = metric_value(record, index, metric)?;

        let group = match group_key {
            Some(field) => match record.get(field) {
                Some(v) => v.render(),
                None => {
                    return Err(EngineError::MalformedRecord {
                        index,
                        field: field.to_string(),
                    });
                }
            },
            None => ALL_GROUP.to_string(),
        };

        match order.iter().position(|g| *g == group) {
            Some(slot) => series[slot].push(value),
            None => {
                order.push(group);
                series.push(vec![value]);
            }
        }
    }

    let groups = order
        .into_iter()
        .zip(series)
        .map(|(group, values)| (group, stats_for(&values)))
        .collect();

    Ok(SummaryResult::from_groups(groups))
}

/// Like [`summarize`], but an empty dataset is an error instead of an
/// empty result.
pub fn summarize_required(
    dataset: &[Record],
    metric: &str,
    group_key: Option<&str>,
) -> Result<SummaryResult, EngineError> {
    if dataset.is_empty() {
        return Err(EngineError::EmptyDataset);
    }
    summarize(dataset, metric, group_key)
}

fn metric_value(record: &Record, index: usize, metric: &str) -> Result<f64, EngineError> {
    record
        .get(metric)
        .and_then(Value::as_f64)
        .ok_or_else(|| EngineError::MalformedRecord {
            index,
            field: metric.to_string(),
        })
}

fn stats_for(values: &[f64]) -> SummaryStats {
    let sum = values.iter().sum();
    let avg = mean(values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SummaryStats {
        count: values.len(),
        sum,
        mean: avg,
        median: median(values),
        min,
        max,
        stddev: stddev(values, avg),
    }
}
