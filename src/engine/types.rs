//! Data types used by the aggregation engine.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Group key used for the single implicit group of an ungrouped summary.
pub const ALL_GROUP: &str = "all";

/// A scalar cell value: text, a float, or a UTC timestamp.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Time(DateTime<Utc>),
}

impl Value {
    /// Best-effort numeric coercion. Floats coerce to themselves, strings
    /// coerce when they parse as a float, timestamps do not coerce.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Time(_) => None,
        }
    }

    /// Renders the value the way it appears in a CSV cell.
    pub fn render(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => format_num(*n),
            Value::Time(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Formats a float without a trailing `.0` for whole numbers, matching how
/// the original score tables were written.
pub(crate) fn format_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One row of input data: an ordered field-name to value mapping,
/// immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Record { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterates over `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Returns a copy of this record with `value` appended under `name`.
    pub fn with_field(&self, name: &str, value: Value) -> Record {
        let mut fields = self.fields.clone();
        fields.push((name.to_string(), value));
        Record { fields }
    }
}

/// Summary statistics for one partition of a dataset.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

/// Grouped summary statistics, in first-seen group order.
///
/// Computed once per aggregation call and immutable afterwards; the
/// reporting side consumes it and throws it away.
#[derive(Debug, Default, Serialize)]
pub struct SummaryResult {
    groups: Vec<(String, SummaryStats)>,
}

impl SummaryResult {
    pub(crate) fn from_groups(groups: Vec<(String, SummaryStats)>) -> Self {
        SummaryResult { groups }
    }

    pub fn get(&self, key: &str) -> Option<&SummaryStats> {
        self.groups
            .iter()
            .find(|(group, _)| group == key)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummaryStats)> {
        self.groups.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
