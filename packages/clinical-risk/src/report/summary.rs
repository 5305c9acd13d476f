use super::PatientRiskRecord;
use crate::risk::CategoryMapping;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_patients: usize,
    pub diabetes_risk_count: usize,
    pub cardiovascular_risk_count: usize,
    /// Every category, including those with no patients
    pub risk_category_counts: BTreeMap<String, usize>,
    pub diabetes_risk_percentage: f64,
    pub cardiovascular_risk_percentage: f64,
}

impl RiskSummary {
    pub fn new(records: &[PatientRiskRecord], categories: &CategoryMapping) -> Self {
        let total_patients = records.len();
        let diabetes_risk_count = records.iter().filter(|r| r.diabetes_risk).count();
        let cardiovascular_risk_count = records.iter().filter(|r| r.cardiovascular_risk).count();

        let mut risk_category_counts: BTreeMap<String, usize> = categories
            .labels()
            .iter()
            .map(|label| (label.clone(), 0))
            .collect();

        for record in records {
            *risk_category_counts
                .entry(record.risk_category.clone())
                .or_default() += 1;
        }

        RiskSummary {
            total_patients,
            diabetes_risk_count,
            cardiovascular_risk_count,
            risk_category_counts,
            diabetes_risk_percentage: percentage(diabetes_risk_count, total_patients),
            cardiovascular_risk_percentage: percentage(cardiovascular_risk_count, total_patients),
        }
    }
}

/// `0.0` when there are no patients.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * count as f64 / total as f64
}
