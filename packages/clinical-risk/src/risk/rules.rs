use crate::config::RulesConfig;
use crate::labs::{LabKind, LatestLabValues};
use derive_more::Display;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCondition {
    #[display("Diabetes")]
    Diabetes,
    #[display("Cardiovascular")]
    Cardiovascular,
}

impl RiskCondition {
    pub const ALL: [RiskCondition; 2] = [RiskCondition::Diabetes, RiskCondition::Cardiovascular];

    pub fn lab(self) -> LabKind {
        match self {
            RiskCondition::Diabetes => LabKind::Glycemic,
            RiskCondition::Cardiovascular => LabKind::Lipid,
        }
    }

    pub fn threshold(self, rules: &RulesConfig) -> f64 {
        match self {
            RiskCondition::Diabetes => rules.glycemic_threshold,
            RiskCondition::Cardiovascular => rules.lipid_threshold,
        }
    }
}

/// One threshold predicate: the latest value of `lab` is at or above `threshold`.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskRule {
    pub condition: RiskCondition,
    pub lab: LabKind,
    pub threshold: f64,
    pub reason: String,
}

impl RiskRule {
    pub fn new(condition: RiskCondition, threshold: f64) -> Self {
        let lab = condition.lab();
        RiskRule {
            condition,
            lab,
            threshold,
            reason: format!("{condition} Risk ({lab} >= {threshold})"),
        }
    }

    /// An absent value never triggers.
    pub fn is_triggered(&self, labs: &LatestLabValues) -> bool {
        labs.value(self.lab)
            .is_some_and(|value| value >= self.threshold)
    }
}
