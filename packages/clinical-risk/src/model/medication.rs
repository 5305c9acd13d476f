use super::{Defaulted, PatientRecord};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Medication {
    pub medication_id: String,
    pub status: String,
    pub medication_name: String,
    pub date: Option<String>,
    pub patient_id: String,
    #[serde(skip)]
    pub defaulted: Defaulted,
}

impl PatientRecord for Medication {
    fn patient_id(&self) -> &str {
        &self.patient_id
    }
}
