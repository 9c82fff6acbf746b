//! Time bucketing: derives group keys from timestamp fields so datasets
//! can be summarized per day, week, month, or year.

use chrono::{DateTime, Datelike, IsoWeek, Utc};

use crate::engine::types::{Record, Value};
use crate::error::EngineError;

/// Granularity of a time-derived group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    Day,
    Week,
    Month,
    Year,
}

impl TimeBucket {
    /// Renders the bucket key for a timestamp, e.g. `2025-03` for
    /// [`TimeBucket::Month`] or `2025-W11` for [`TimeBucket::Week`].
    pub fn key(&self, ts: DateTime<Utc>) -> String {
        match self {
            TimeBucket::Day => ts.format("%Y-%m-%d").to_string(),
            TimeBucket::Week => iso_week_key(ts.iso_week()),
            TimeBucket::Month => ts.format("%Y-%m").to_string(),
            TimeBucket::Year => ts.format("%Y").to_string(),
        }
    }
}

fn iso_week_key(week: IsoWeek) -> String {
    format!("{}-W{:02}", week.year(), week.week())
}

/// Returns a copy of `dataset` where every record carries an extra field
/// named `bucket_field`, holding the record's time bucket key.
///
/// # Errors
///
/// [`EngineError::MalformedRecord`] when a record lacks `time_field` or it
/// is not a timestamp.
pub fn bucket_by_time(
    dataset: &[Record],
    time_field: &str,
    bucket: TimeBucket,
    bucket_field: &str,
) -> Result<Vec<Record>, EngineError> {
    dataset
        .iter()
        .enumerate()
        .map(|(index, record)| match record.get(time_field) {
            Some(Value::Time(ts)) => {
                Ok(record.with_field(bucket_field, Value::Str(bucket.key(*ts))))
            }
            _ => Err(EngineError::MalformedRecord {
                index,
                field: time_field.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_bucket_keys() {
        let t = ts(2025, 3, 14);
        assert_eq!(TimeBucket::Day.key(t), "2025-03-14");
        assert_eq!(TimeBucket::Week.key(t), "2025-W11");
        assert_eq!(TimeBucket::Month.key(t), "2025-03");
        assert_eq!(TimeBucket::Year.key(t), "2025");
    }

    #[test]
    fn test_bucket_by_time_tags_records() {
        let dataset = vec![
            Record::new(vec![
                ("date".to_string(), Value::Time(ts(2025, 1, 5))),
                ("kwh".to_string(), Value::Num(3.0)),
            ]),
            Record::new(vec![
                ("date".to_string(), Value::Time(ts(2025, 2, 5))),
                ("kwh".to_string(), Value::Num(4.0)),
            ]),
        ];

        let tagged = bucket_by_time(&dataset, "date", TimeBucket::Month, "month").unwrap();
        assert_eq!(tagged[0].get("month"), Some(&Value::Str("2025-01".into())));
        assert_eq!(tagged[1].get("month"), Some(&Value::Str("2025-02".into())));
    }

    #[test]
    fn test_bucket_by_time_rejects_non_timestamp() {
        let dataset = vec![Record::new(vec![(
            "date".to_string(),
            Value::Str("yesterday".to_string()),
        )])];

        assert!(bucket_by_time(&dataset, "date", TimeBucket::Day, "day").is_err());
    }
}
