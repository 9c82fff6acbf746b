use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::GradingConfig;
use crate::engine::{ALL_GROUP, Record, SummaryStats, Value, classify, summarize_required};
use crate::ingest::RecordSource;
use crate::output::{ResultRow, print_results_table, print_stats, write_results_csv};

/// Everything the gradebook workflow derives from one class of scores.
#[derive(Debug)]
pub struct GradebookReport {
    pub rows: Vec<ResultRow>,
    pub stats: SummaryStats,
    /// Grade label to student count, in threshold-table order. Labels with
    /// no students are omitted.
    pub distribution: Vec<(String, usize)>,
    pub passed: Vec<String>,
    pub failed: Vec<String>,
}

/// Grades a dataset of `name`/`score` records and computes the class
/// statistics, grade distribution, and pass/fail partition.
///
/// Records without a `name` field are skipped with a warning. An empty
/// dataset is an error, matching the console tool's "no data entered"
/// behavior.
pub fn grade_records(dataset: &[Record], config: &GradingConfig) -> Result<GradebookReport> {
    let mut rows = Vec::new();
    let mut graded = Vec::new();

    for (index, record) in dataset.iter().enumerate() {
        let Some(name) = record.get("name").map(Value::render) else {
            warn!(index, "Skipping record without a name field");
            continue;
        };
        let marks = record
            .get("score")
            .and_then(Value::as_f64)
            .with_context(|| format!("record {index} ({name}): score is missing or not numeric"))?;

        let grade = classify(marks, &config.thresholds)?;
        let status = if marks >= config.pass_mark {
            "Pass"
        } else {
            "Fail"
        };

        rows.push(ResultRow {
            name,
            marks,
            grade: grade.to_string(),
            status: status.to_string(),
        });
        graded.push(record.clone());
    }

    // class statistics cover exactly the records that were graded
    let summary = summarize_required(&graded, "score", None)?;
    let stats = summary
        .get(ALL_GROUP)
        .cloned()
        .context("summary missing the ungrouped partition")?;

    let mut distribution: Vec<(String, usize)> = config
        .thresholds
        .iter()
        .map(|(_, label)| (label.clone(), 0))
        .collect();
    for row in &rows {
        if let Some(entry) = distribution.iter_mut().find(|(label, _)| *label == row.grade) {
            entry.1 += 1;
        }
    }
    distribution.retain(|(_, count)| *count > 0);

    let passed = rows
        .iter()
        .filter(|r| r.status == "Pass")
        .map(|r| r.name.clone())
        .collect();
    let failed = rows
        .iter()
        .filter(|r| r.status == "Fail")
        .map(|r| r.name.clone())
        .collect();

    Ok(GradebookReport {
        rows,
        stats,
        distribution,
        passed,
        failed,
    })
}

/// Runs the full gradebook workflow: collect records from `source`, grade
/// them, print the console report, and save the results CSV.
pub fn run(source: &mut dyn RecordSource, output: &str, config: &GradingConfig) -> Result<()> {
    let dataset = source.records()?;
    let report = grade_records(&dataset, config)?;

    println!("\nStudent Results:");
    print_results_table(&report.rows);

    println!();
    print_stats("Class", &report.stats);

    println!("\nGrade distribution:");
    for (grade, count) in &report.distribution {
        println!("  {}: {}", grade, count);
    }

    println!(
        "\nPassed ({}): {}",
        report.passed.len(),
        report.passed.join(", ")
    );
    println!(
        "Failed ({}): {}",
        report.failed.len(),
        report.failed.join(", ")
    );

    write_results_csv(output, &report.rows)?;
    info!(output, students = report.rows.len(), "Gradebook run complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_record(name: &str, score: f64) -> Record {
        Record::new(vec![
            ("name".to_string(), Value::Str(name.to_string())),
            ("score".to_string(), Value::Num(score)),
        ])
    }

    fn sample_class() -> Vec<Record> {
        vec![
            score_record("Alice", 95.0),
            score_record("Bob", 62.0),
            score_record("Carol", 38.0),
        ]
    }

    #[test]
    fn test_grades_and_pass_fail_partition() {
        let report = grade_records(&sample_class(), &GradingConfig::default()).unwrap();

        let grades: Vec<_> = report
            .rows
            .iter()
            .map(|r| (r.name.as_str(), r.grade.as_str()))
            .collect();
        assert_eq!(grades, vec![("Alice", "A"), ("Bob", "D"), ("Carol", "F")]);

        assert_eq!(report.passed, vec!["Alice", "Bob"]);
        assert_eq!(report.failed, vec!["Carol"]);
    }

    #[test]
    fn test_class_statistics() {
        let report = grade_records(&sample_class(), &GradingConfig::default()).unwrap();

        assert_eq!(report.stats.mean, 65.0);
        assert_eq!(report.stats.median, 62.0);
        assert_eq!(report.stats.max, 95.0);
        assert_eq!(report.stats.min, 38.0);
    }

    #[test]
    fn test_distribution_in_scale_order() {
        let report = grade_records(&sample_class(), &GradingConfig::default()).unwrap();

        assert_eq!(
            report.distribution,
            vec![
                ("A".to_string(), 1),
                ("D".to_string(), 1),
                ("F".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_nameless_record_is_skipped_not_fatal() {
        let mut dataset = sample_class();
        // no name and no score, only an unrelated field
        dataset.push(Record::new(vec![(
            "remark".to_string(),
            Value::Str("late entry".to_string()),
        )]));

        let report = grade_records(&dataset, &GradingConfig::default()).unwrap();
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.stats.count, 3);
        assert_eq!(report.stats.mean, 65.0);
    }

    #[test]
    fn test_empty_class_is_an_error() {
        assert!(grade_records(&[], &GradingConfig::default()).is_err());
    }

    #[test]
    fn test_non_numeric_score_is_an_error() {
        let dataset = vec![Record::new(vec![
            ("name".to_string(), Value::Str("Eve".to_string())),
            ("score".to_string(), Value::Str("absent".to_string())),
        ])];

        assert!(grade_records(&dataset, &GradingConfig::default()).is_err());
    }
}
