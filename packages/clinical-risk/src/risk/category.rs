use crate::error::ConfigError;

/// Total mapping from risk score to category label.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryMapping {
    labels: Vec<String>,
}

impl CategoryMapping {
    /// `labels[score]` is the category for `score`. One label per score in `0..=rule_count`.
    pub fn new(labels: &[String], rule_count: usize) -> Result<Self, ConfigError> {
        let expected = rule_count + 1;
        if labels.len() != expected {
            return Err(ConfigError::CategoryMappingMismatch {
                rules: rule_count,
                expected,
                found: labels.len(),
            });
        }

        Ok(CategoryMapping {
            labels: labels.to_vec(),
        })
    }

    pub fn label(&self, score: usize) -> &str {
        // Scores are bounded by the rule count checked in `new`
        &self.labels[score.min(self.labels.len() - 1)]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn maps_score_to_label() {
        let mapping = CategoryMapping::new(&labels(&["Low", "Moderate", "High"]), 2).unwrap();

        assert_eq!(mapping.label(0), "Low");
        assert_eq!(mapping.label(1), "Moderate");
        assert_eq!(mapping.label(2), "High");
    }

    #[test]
    fn rejects_mapping_that_is_not_total() {
        let err = CategoryMapping::new(&labels(&["Low", "High"]), 2).unwrap_err();

        assert_eq!(err.to_string(), "Expected 3 risk categories for 2 rules, found 2");
    }
}
