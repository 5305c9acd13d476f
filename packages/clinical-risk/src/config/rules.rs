use crate::error::ConfigError;
use crate::risk::RULE_COUNT;
use serde::Deserialize;
use std::collections::HashSet;

pub const DEFAULT_GLYCEMIC_TEST: &str = "hemoglobin a1c";
pub const DEFAULT_GLYCEMIC_THRESHOLD: f64 = 6.5;
pub const DEFAULT_LIPID_TEST: &str = "cholesterol";
pub const DEFAULT_LIPID_THRESHOLD: f64 = 240.0;

///
/// Thresholds, lab test names and score labels injected into the classifier.
///
/// `categories` is indexed by risk score, so it must hold one label per possible score.
/// Adding a rule means adding a label here.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RulesConfig {
    #[serde(default = "RulesConfig::default_glycemic_test")]
    pub glycemic_test: String,

    #[serde(default = "RulesConfig::default_glycemic_threshold")]
    pub glycemic_threshold: f64,

    #[serde(default = "RulesConfig::default_lipid_test")]
    pub lipid_test: String,

    #[serde(default = "RulesConfig::default_lipid_threshold")]
    pub lipid_threshold: f64,

    #[serde(default = "RulesConfig::default_categories")]
    pub categories: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            glycemic_test: RulesConfig::default_glycemic_test(),
            glycemic_threshold: RulesConfig::default_glycemic_threshold(),
            lipid_test: RulesConfig::default_lipid_test(),
            lipid_threshold: RulesConfig::default_lipid_threshold(),
            categories: RulesConfig::default_categories(),
        }
    }
}

impl RulesConfig {
    pub fn default_glycemic_test() -> String {
        DEFAULT_GLYCEMIC_TEST.to_string()
    }

    pub const fn default_glycemic_threshold() -> f64 {
        DEFAULT_GLYCEMIC_THRESHOLD
    }

    pub fn default_lipid_test() -> String {
        DEFAULT_LIPID_TEST.to_string()
    }

    pub const fn default_lipid_threshold() -> f64 {
        DEFAULT_LIPID_THRESHOLD
    }

    pub fn default_categories() -> Vec<String> {
        vec![
            "Low Risk".to_string(),
            "Moderate Risk".to_string(),
            "High Risk".to_string(),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, test) in [
            ("rules.glycemic_test", &self.glycemic_test),
            ("rules.lipid_test", &self.lipid_test),
        ] {
            if test.trim().is_empty() {
                return Err(ConfigError::EmptyTestName {
                    name: name.to_string(),
                });
            }
        }

        for (name, value) in [
            ("rules.glycemic_threshold", self.glycemic_threshold),
            ("rules.lipid_threshold", self.lipid_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold {
                    name: name.to_string(),
                    value,
                });
            }
        }

        let expected = RULE_COUNT + 1;
        if self.categories.len() != expected {
            return Err(ConfigError::CategoryMappingMismatch {
                rules: RULE_COUNT,
                expected,
                found: self.categories.len(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(label) = self.categories.iter().find(|label| !seen.insert(label.as_str())) {
            return Err(ConfigError::DuplicateCategory {
                label: label.to_owned(),
            });
        }

        Ok(())
    }
}
