use super::{Defaulted, PatientRecord};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Allergy {
    pub allergy_id: String,
    pub status: String,
    pub allergy_type: String,
    /// Text of the first manifestation of the first reaction
    pub manifestation: String,
    pub patient_id: String,
    #[serde(skip)]
    pub defaulted: Defaulted,
}

impl PatientRecord for Allergy {
    fn patient_id(&self) -> &str {
        &self.patient_id
    }
}
