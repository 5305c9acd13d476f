use super::{Defaulted, PatientRecord};
use serde::Serialize;

/// A single lab result.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Observation {
    pub observation_id: String,
    pub status: String,
    /// Free-text test name from `code.text`, compared case-insensitively
    pub code: String,
    /// Absent when the observation carries no quantity
    pub value: Option<f64>,
    pub unit: String,
    /// `effectiveDateTime` as written in the source, zero-padded ISO
    pub date: Option<String>,
    pub patient_id: String,
    #[serde(skip)]
    pub defaulted: Defaulted,
}

impl Observation {
    pub fn is_test(&self, test_name: &str) -> bool {
        self.code.to_lowercase() == test_name.to_lowercase()
    }
}

impl PatientRecord for Observation {
    fn patient_id(&self) -> &str {
        &self.patient_id
    }
}
