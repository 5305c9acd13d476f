//! Flat entities produced by normalizing a FHIR-shaped document.
//!
//! Each entity keeps the names of the fields the tolerant parser had to default,
//! so malformed input can be inspected without failing the load.

mod allergy;
mod medication;
mod observation;
mod patient;

pub use allergy::Allergy;
pub use medication::Medication;
pub use observation::Observation;
pub use patient::{Gender, Patient};

/// Field names substituted with a default during normalization.
pub type Defaulted = Vec<&'static str>;

/// A record owned by a patient through a `Patient/<id>` reference.
///
/// An empty `patient_id` means the reference could not be resolved and the
/// record is never joined to a patient.
pub trait PatientRecord {
    fn patient_id(&self) -> &str;

    fn is_resolved(&self) -> bool {
        !self.patient_id().is_empty()
    }
}
