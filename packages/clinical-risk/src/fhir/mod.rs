//! Loads a FHIR-shaped JSON document and normalizes its resources into flat entities.

mod record;
pub mod reference;

use crate::error::LoadError;
use crate::log::LOAD;
use crate::model::{Allergy, Gender, Medication, Observation, Patient, PatientRecord};
use record::Record;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const PATIENTS: &str = "patients";
pub const OBSERVATIONS: &str = "observations";
pub const MEDICATIONS: &str = "medications";
pub const ALLERGIES: &str = "allergies";

/// The four flat entity collections of one input document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClinicalData {
    pub patients: Vec<Patient>,
    pub observations: Vec<Observation>,
    pub medications: Vec<Medication>,
    pub allergies: Vec<Allergy>,
}

impl ClinicalData {
    pub fn unresolved_observations(&self) -> usize {
        count_unresolved(&self.observations)
    }

    pub fn unresolved_medications(&self) -> usize {
        count_unresolved(&self.medications)
    }

    pub fn unresolved_allergies(&self) -> usize {
        count_unresolved(&self.allergies)
    }
}

fn count_unresolved<R: PatientRecord>(records: &[R]) -> usize {
    records.iter().filter(|r| !r.is_resolved()).count()
}

///
/// Reads and normalizes the input file.
///
/// An unreadable file, invalid JSON or an invalid top-level structure fails the load.
/// Everything below the top level degrades to defaults.
///
pub fn load(path: &Path) -> Result<ClinicalData, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        path: path.to_owned(),
        source,
    })?;

    debug!(target: LOAD, msg = "Read input file", path = %path.display(), bytes = contents.len());

    parse(&contents)
}

pub fn parse(json: &str) -> Result<ClinicalData, LoadError> {
    let document: Value = serde_json::from_str(json)?;
    normalize(&document)
}

pub fn normalize(document: &Value) -> Result<ClinicalData, LoadError> {
    let document = document.as_object().ok_or(LoadError::NotAnObject {
        found: json_type(document),
    })?;

    let data = ClinicalData {
        patients: collection(document, PATIENTS)?
            .iter()
            .map(normalize_patient)
            .collect(),
        observations: collection(document, OBSERVATIONS)?
            .iter()
            .map(normalize_observation)
            .collect(),
        medications: collection(document, MEDICATIONS)?
            .iter()
            .map(normalize_medication)
            .collect(),
        allergies: collection(document, ALLERGIES)?
            .iter()
            .map(normalize_allergy)
            .collect(),
    };

    info!(
        target: LOAD,
        msg = "Normalized clinical data",
        patients = data.patients.len(),
        observations = data.observations.len(),
        medications = data.medications.len(),
        allergies = data.allergies.len(),
    );

    let unresolved = data.unresolved_observations()
        + data.unresolved_medications()
        + data.unresolved_allergies();

    if unresolved > 0 {
        debug!(
            target: LOAD,
            msg = "Records with unresolved patient references are excluded from joins",
            observations = data.unresolved_observations(),
            medications = data.unresolved_medications(),
            allergies = data.unresolved_allergies(),
        );
    }

    Ok(data)
}

///
/// A missing or null collection is empty. Any other non-array value is an invalid document.
///
fn collection<'a>(
    document: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a [Value], LoadError> {
    match document.get(name) {
        None | Some(Value::Null) => {
            debug!(target: LOAD, msg = "Collection is absent", collection = name);
            Ok(&[])
        }
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(LoadError::CollectionNotAnArray {
            collection: name,
            found: json_type(other),
        }),
    }
}

pub fn normalize_patient(value: &Value) -> Patient {
    let mut record = Record::new(value);

    let patient_id = record.string("patient_id", "/id");

    let family_name = record.string("family_name", "/name/0/family");
    let given_names = record.strings("given_name", "/name/0/given");
    let full_name = format!("{} {}", given_names.join(" "), family_name);
    let given_name = given_names.first().cloned().unwrap_or_default();

    let gender = match record.optional_string("gender", "/gender") {
        Some(code) => Gender::parse(&code).unwrap_or_else(|| {
            record.mark_defaulted("gender");
            Gender::Unknown
        }),
        None => Gender::Unknown,
    };

    let birthdate = record.optional_string("birthdate", "/birthDate");

    let city = record.string("city", "/address/0/city");
    let state = record.string("state", "/address/0/state");
    let postal_code = record.string("postal_code", "/address/0/postalCode");

    Patient {
        patient_id,
        full_name,
        family_name,
        given_name,
        gender,
        birthdate,
        city,
        state,
        postal_code,
        defaulted: record.into_defaulted(),
    }
}

pub fn normalize_observation(value: &Value) -> Observation {
    let mut record = Record::new(value);

    let patient_id = resolve_reference(&mut record, "/subject/reference");

    Observation {
        observation_id: record.string("observation_id", "/id"),
        status: record.string("status", "/status"),
        code: record.string("code", "/code/text"),
        value: record.number("value", "/valueQuantity/value"),
        unit: record.string("unit", "/valueQuantity/unit"),
        date: record.optional_string("date", "/effectiveDateTime"),
        patient_id,
        defaulted: record.into_defaulted(),
    }
}

pub fn normalize_medication(value: &Value) -> Medication {
    let mut record = Record::new(value);

    let patient_id = resolve_reference(&mut record, "/subject/reference");

    Medication {
        medication_id: record.string("medication_id", "/id"),
        status: record.string("status", "/status"),
        medication_name: record.string("medication_name", "/medicationCodeableConcept/text"),
        date: record.optional_string("date", "/authoredOn"),
        patient_id,
        defaulted: record.into_defaulted(),
    }
}

pub fn normalize_allergy(value: &Value) -> Allergy {
    let mut record = Record::new(value);

    let patient_id = resolve_reference(&mut record, "/patient/reference");

    Allergy {
        allergy_id: record.string("allergy_id", "/id"),
        status: record.string("status", "/clinicalStatus/text"),
        allergy_type: record.string("allergy_type", "/code/text"),
        manifestation: record.string("manifestation", "/reaction/0/manifestation/0/text"),
        patient_id,
        defaulted: record.into_defaulted(),
    }
}

fn resolve_reference(record: &mut Record, pointer: &str) -> String {
    let reference = record.string("patient_id", pointer);
    reference::patient_id(&reference)
        .map(str::to_owned)
        .unwrap_or_default()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PatientRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn normalizes_patient() {
        let value = json!({
            "id": "patient-1",
            "name": [{ "family": "Lovelace", "given": ["Ada", "Augusta"] }],
            "gender": "female",
            "birthDate": "1980-12-10",
            "address": [{ "city": "Boston", "state": "MA", "postalCode": "02110" }]
        });

        let patient = normalize_patient(&value);

        assert_eq!(
            patient,
            Patient {
                patient_id: "patient-1".to_string(),
                full_name: "Ada Augusta Lovelace".to_string(),
                family_name: "Lovelace".to_string(),
                given_name: "Ada".to_string(),
                gender: Gender::Female,
                birthdate: Some("1980-12-10".to_string()),
                city: "Boston".to_string(),
                state: "MA".to_string(),
                postal_code: "02110".to_string(),
                defaulted: vec![],
            }
        );
    }

    #[test]
    fn patient_without_given_names_keeps_leading_space() {
        let value = json!({ "id": "patient-2", "name": [{ "family": "Turing" }] });

        let patient = normalize_patient(&value);

        assert_eq!(patient.full_name, " Turing");
        assert_eq!(patient.given_name, "");
        assert!(patient.was_defaulted("given_name"));
    }

    #[test]
    fn patient_missing_everything_degrades_to_defaults() {
        let patient = normalize_patient(&json!({}));

        assert_eq!(patient.patient_id, "");
        assert_eq!(patient.full_name, " ");
        assert_eq!(patient.gender, Gender::Unknown);
        assert_eq!(patient.birthdate, None);
        assert!(patient.was_defaulted("patient_id"));
        assert!(patient.was_defaulted("birthdate"));
        assert!(patient.was_defaulted("postal_code"));
    }

    #[test]
    fn unrecognised_gender_is_unknown() {
        let patient = normalize_patient(&json!({ "id": "p", "gender": "f" }));
        assert_eq!(patient.gender, Gender::Unknown);
        assert!(patient.was_defaulted("gender"));
    }

    #[test]
    fn normalizes_observation() {
        let value = json!({
            "id": "obs-1",
            "status": "final",
            "code": { "text": "Hemoglobin A1c" },
            "valueQuantity": { "value": 7.0, "unit": "%" },
            "effectiveDateTime": "2023-06-01",
            "subject": { "reference": "Patient/patient-1" }
        });

        let observation = normalize_observation(&value);

        assert_eq!(observation.observation_id, "obs-1");
        assert_eq!(observation.code, "Hemoglobin A1c");
        assert_eq!(observation.value, Some(7.0));
        assert_eq!(observation.unit, "%");
        assert_eq!(observation.date.as_deref(), Some("2023-06-01"));
        assert_eq!(observation.patient_id, "patient-1");
        assert!(observation.defaulted.is_empty());
    }

    #[test]
    fn observation_without_quantity_has_no_value() {
        let value = json!({
            "id": "obs-2",
            "code": { "text": "Cholesterol" },
            "subject": { "reference": "Patient/patient-1" }
        });

        let observation = normalize_observation(&value);

        assert_eq!(observation.value, None);
        assert_eq!(observation.date, None);
        assert_eq!(observation.defaulted, vec!["status", "value", "unit", "date"]);
    }

    #[test]
    fn observation_with_bad_reference_is_unresolved() {
        let missing = normalize_observation(&json!({ "id": "obs-3" }));
        let trailing = normalize_observation(
            &json!({ "id": "obs-4", "subject": { "reference": "Patient/" } }),
        );
        let wrong_type = normalize_observation(
            &json!({ "id": "obs-5", "subject": { "reference": "Device/patient-1" } }),
        );

        assert!(!missing.is_resolved());
        assert!(!trailing.is_resolved());
        assert!(!wrong_type.is_resolved());
    }

    #[test]
    fn out_of_range_value_defaults_instead_of_failing_the_load() {
        let json = r#"{
            "patients": [{ "id": "p1" }],
            "observations": [
                {
                    "id": "obs-1",
                    "code": { "text": "Cholesterol" },
                    "valueQuantity": { "value": 1e400, "unit": "mg/dL" },
                    "subject": { "reference": "Patient/p1" }
                },
                {
                    "id": "obs-2",
                    "code": { "text": "Cholesterol" },
                    "valueQuantity": { "value": 250, "unit": "mg/dL" },
                    "subject": { "reference": "Patient/p1/_history/3" }
                }
            ]
        }"#;

        let data = parse(json).unwrap();

        assert_eq!(data.observations.len(), 2);
        assert_eq!(data.observations[0].value, None);
        assert!(data.observations[0].defaulted.contains(&"value"));
        assert_eq!(data.observations[1].value, Some(250.0));
        assert_eq!(data.observations[1].patient_id, "p1");
    }

    #[test]
    fn normalizes_medication_and_allergy() {
        let medication = normalize_medication(&json!({
            "id": "med-1",
            "status": "active",
            "medicationCodeableConcept": { "text": "Metformin 500 MG" },
            "subject": { "reference": "Patient/patient-1" },
            "authoredOn": "2023-02-14"
        }));

        assert_eq!(medication.medication_name, "Metformin 500 MG");
        assert_eq!(medication.date.as_deref(), Some("2023-02-14"));
        assert_eq!(medication.patient_id, "patient-1");

        let allergy = normalize_allergy(&json!({
            "id": "allergy-1",
            "clinicalStatus": { "text": "Active" },
            "code": { "text": "Penicillin" },
            "reaction": [{ "manifestation": [{ "text": "Hives" }] }],
            "patient": { "reference": "Patient/patient-1" }
        }));

        assert_eq!(allergy.status, "Active");
        assert_eq!(allergy.allergy_type, "Penicillin");
        assert_eq!(allergy.manifestation, "Hives");
        assert_eq!(allergy.patient_id, "patient-1");
    }

    #[test]
    fn absent_collections_are_empty() {
        let data = normalize(&json!({ "patients": [{ "id": "patient-1" }] })).unwrap();

        assert_eq!(data.patients.len(), 1);
        assert!(data.observations.is_empty());
        assert!(data.medications.is_empty());
        assert!(data.allergies.is_empty());
    }

    #[test]
    fn null_collection_is_empty() {
        let data = normalize(&json!({ "observations": null })).unwrap();
        assert!(data.observations.is_empty());
    }

    #[test]
    fn non_object_document_is_rejected() {
        let err = normalize(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject { found: "array" }));
    }

    #[test]
    fn non_array_collection_is_rejected() {
        let err = normalize(&json!({ "patients": { "id": "patient-1" } })).unwrap_err();
        assert!(matches!(
            err,
            LoadError::CollectionNotAnArray {
                collection: "patients",
                found: "object"
            }
        ));
    }

    #[test]
    fn non_object_records_degrade() {
        let data = normalize(&json!({ "observations": ["junk", 4] })).unwrap();

        assert_eq!(data.observations.len(), 2);
        assert_eq!(data.unresolved_observations(), 2);
    }

    #[test]
    fn invalid_json_is_rejected() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::InvalidJson(_)));
    }

    #[test]
    fn unreadable_file_is_rejected() {
        let err = load(Path::new("tests/data/does-not-exist.json")).unwrap_err();
        assert!(matches!(err, LoadError::Unreadable { .. }));
    }
}
