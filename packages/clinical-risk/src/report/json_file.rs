use super::{PatientRiskRecord, RiskSummary};
use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// `YYYY-MM-DD`
    pub report_date: String,
    pub summary: RiskSummary,
    pub high_risk_patients: Vec<PatientRiskRecord>,
}

pub fn write(path: &Path, report: &RiskReport) -> Result<(), ReportError> {
    let write_error = |source| ReportError::Write {
        path: path.to_owned(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush().map_err(write_error)?;

    Ok(())
}

pub fn read(path: &Path) -> Result<RiskReport, ReportError> {
    let contents = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_owned(),
        source,
    })?;

    Ok(serde_json::from_str(&contents)?)
}
