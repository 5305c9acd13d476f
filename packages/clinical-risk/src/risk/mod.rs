//! Rule-based risk classification over the latest lab values of one patient.

mod category;
mod rules;

pub use category::CategoryMapping;
pub use rules::{RiskCondition, RiskRule};

use crate::config::RulesConfig;
use crate::error::ConfigError;
use crate::labs::LatestLabValues;
use crate::log::RISK;
use serde::Serialize;
use tracing::debug;

pub const RULE_COUNT: usize = RiskCondition::ALL.len();

pub const REASON_SEPARATOR: &str = "; ";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub diabetes_risk: bool,
    pub cardiovascular_risk: bool,
    pub risk_score: usize,
    pub risk_category: String,
    pub risk_reasons: String,
}

impl RiskAssessment {
    pub fn flag(&self, condition: RiskCondition) -> bool {
        match condition {
            RiskCondition::Diabetes => self.diabetes_risk,
            RiskCondition::Cardiovascular => self.cardiovascular_risk,
        }
    }
}

///
/// Applies the ordered rule set and maps the score to a category.
///
/// Built once from `RulesConfig`; classification itself is pure.
///
#[derive(Clone, Debug)]
pub struct RiskClassifier {
    rules: Vec<RiskRule>,
    categories: CategoryMapping,
}

impl RiskClassifier {
    pub fn from_config(config: &RulesConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rules: Vec<RiskRule> = RiskCondition::ALL
            .iter()
            .map(|condition| RiskRule::new(*condition, condition.threshold(config)))
            .collect();

        let categories = CategoryMapping::new(&config.categories, rules.len())?;

        debug!(target: RISK, msg = "Risk classifier", ?rules, categories = ?categories.labels());

        Ok(RiskClassifier { rules, categories })
    }

    pub fn categories(&self) -> &CategoryMapping {
        &self.categories
    }

    pub fn classify(&self, labs: &LatestLabValues) -> RiskAssessment {
        let triggered: Vec<&RiskRule> = self
            .rules
            .iter()
            .filter(|rule| rule.is_triggered(labs))
            .collect();

        let is_triggered = |condition: RiskCondition| {
            triggered.iter().any(|rule| rule.condition == condition)
        };

        let risk_score = triggered.len();

        RiskAssessment {
            diabetes_risk: is_triggered(RiskCondition::Diabetes),
            cardiovascular_risk: is_triggered(RiskCondition::Cardiovascular),
            risk_score,
            risk_category: self.categories.label(risk_score).to_string(),
            risk_reasons: triggered
                .iter()
                .map(|rule| rule.reason.as_str())
                .collect::<Vec<_>>()
                .join(REASON_SEPARATOR),
        }
    }
}
