use super::PatientRiskRecord;
use crate::error::ReportError;
use crate::model::Gender;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

pub const COLUMNS: [&str; 9] = [
    "patient_id",
    "full_name",
    "gender",
    "age",
    "risk_category",
    "risk_score",
    "risk_reasons",
    "glycemic_value",
    "lipid_value",
];

/// One CSV row. Field order is the column order.
#[derive(Serialize)]
struct Row<'a> {
    patient_id: &'a str,
    full_name: &'a str,
    gender: Gender,
    age: Option<u32>,
    risk_category: &'a str,
    risk_score: usize,
    risk_reasons: &'a str,
    glycemic_value: Option<f64>,
    lipid_value: Option<f64>,
}

impl<'a> From<&'a PatientRiskRecord> for Row<'a> {
    fn from(record: &'a PatientRiskRecord) -> Self {
        Row {
            patient_id: &record.patient_id,
            full_name: &record.full_name,
            gender: record.gender,
            age: record.age,
            risk_category: &record.risk_category,
            risk_score: record.risk_score,
            risk_reasons: &record.risk_reasons,
            glycemic_value: record.glycemic_value,
            lipid_value: record.lipid_value,
        }
    }
}

/// The header is always written, so an empty report is a header-only file.
pub fn to_writer<W: io::Write>(writer: W, records: &[PatientRiskRecord]) -> Result<(), ReportError> {
    let mut rows = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    rows.write_record(COLUMNS)?;
    for record in records {
        rows.serialize(Row::from(record))?;
    }
    rows.flush().map_err(csv::Error::from)?;

    Ok(())
}

pub fn write(path: &Path, records: &[PatientRiskRecord]) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Write {
        path: path.to_owned(),
        source,
    })?;

    to_writer(file, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn to_string(records: &[PatientRiskRecord]) -> String {
        let mut buf = Vec::new();
        to_writer(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_report_has_header() {
        assert_eq!(
            to_string(&[]),
            "patient_id,full_name,gender,age,risk_category,risk_score,risk_reasons,glycemic_value,lipid_value\n"
        );
    }

    #[test]
    fn absent_values_are_empty_cells() {
        let record = PatientRiskRecord {
            patient_id: "p1".to_string(),
            full_name: "Ada Lovelace".to_string(),
            gender: Gender::Female,
            age: None,
            risk_score: 1,
            risk_category: "Moderate Risk".to_string(),
            risk_reasons: "Diabetes Risk (HbA1c >= 6.5)".to_string(),
            glycemic_value: Some(7.0),
            lipid_value: None,
            ..Default::default()
        };

        let csv = to_string(&[record]);
        let row = csv.lines().nth(1).unwrap();

        assert_eq!(
            row,
            "p1,Ada Lovelace,female,,Moderate Risk,1,Diabetes Risk (HbA1c >= 6.5),7.0,"
        );
    }

    #[test]
    fn quotes_joined_reasons() {
        let record = PatientRiskRecord {
            patient_id: "p2".to_string(),
            full_name: " Turing".to_string(),
            age: Some(41),
            risk_score: 2,
            risk_category: "High Risk".to_string(),
            risk_reasons: "A, b; C".to_string(),
            glycemic_value: Some(8.1),
            lipid_value: Some(250.5),
            ..Default::default()
        };

        let csv = to_string(&[record]);

        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "p2, Turing,unknown,41,High Risk,2,\"A, b; C\",8.1,250.5"
        );
    }
}
