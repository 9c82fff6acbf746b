use anyhow::Result;
use serde::Deserialize;

/// Grade cutoffs and the pass mark, lifted out of the reporting code so
/// callers can supply their own scale.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "thresholds": [[90, "A"], [80, "B"], [70, "C"], [60, "D"], [0, "F"]],
///   "pass_mark": 40
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct GradingConfig {
    /// `(lower_bound, label)` pairs sorted descending by bound. The final
    /// bound must be a catch-all so every score classifies.
    pub thresholds: Vec<(f64, String)>,
    /// Scores at or above this mark count as a pass.
    pub pass_mark: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        GradingConfig {
            thresholds: [
                (90.0, "A"),
                (80.0, "B"),
                (70.0, "C"),
                (60.0, "D"),
                (0.0, "F"),
            ]
            .iter()
            .map(|(bound, label)| (*bound, label.to_string()))
            .collect(),
            pass_mark: 40.0,
        }
    }
}

impl GradingConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GradingConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify;

    #[test]
    fn test_default_scale() {
        let config = GradingConfig::default();
        assert_eq!(config.pass_mark, 40.0);
        assert_eq!(classify(95.0, &config.thresholds).unwrap(), "A");
        assert_eq!(classify(59.0, &config.thresholds).unwrap(), "F");
    }

    #[test]
    fn test_load_from_json() {
        let path = format!(
            "{}/table_rater_test_grading.json",
            std::env::temp_dir().display()
        );
        std::fs::write(
            &path,
            r#"{"thresholds": [[50, "pass"], [0, "fail"]], "pass_mark": 50}"#,
        )
        .unwrap();

        let config = GradingConfig::load(&path).unwrap();
        assert_eq!(config.pass_mark, 50.0);
        assert_eq!(classify(50.0, &config.thresholds).unwrap(), "pass");
        assert_eq!(classify(49.0, &config.thresholds).unwrap(), "fail");

        std::fs::remove_file(&path).unwrap();
    }
}
