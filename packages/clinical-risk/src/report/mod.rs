//! Joins patients with their risk assessment, summarizes the population and writes the reports.

mod csv_file;
mod filter;
mod json_file;
mod summary;

pub use csv_file::COLUMNS as CSV_COLUMNS;
pub use filter::PatientFilter;
pub use json_file::RiskReport;
pub use summary::{percentage, RiskSummary};

use crate::config::{OutputConfig, PipelineConfig, RulesConfig};
use crate::enrich::{enrich_patients, AgeBracket, EnrichedPatient};
use crate::error::{ConfigError, Error, ReportError};
use crate::fhir::{self, ClinicalData};
use crate::labs::{resolve_latest_labs, LatestLabValues};
use crate::log::REPORT;
use crate::model::Gender;
use crate::risk::{RiskAssessment, RiskClassifier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

///
/// One patient with demographics, latest labs and risk assessment.
///
/// Patients without labs have absent lab fields, both flags false, score 0 and
/// the lowest category.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRiskRecord {
    pub patient_id: String,
    pub full_name: String,
    pub family_name: String,
    pub given_name: String,
    pub gender: Gender,
    pub birthdate: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub age: Option<u32>,
    pub age_group: Option<AgeBracket>,
    pub glycemic_value: Option<f64>,
    pub glycemic_date: Option<String>,
    pub lipid_value: Option<f64>,
    pub lipid_date: Option<String>,
    pub diabetes_risk: bool,
    pub cardiovascular_risk: bool,
    pub risk_score: usize,
    pub risk_category: String,
    pub risk_reasons: String,
}

impl PatientRiskRecord {
    pub fn new(enriched: EnrichedPatient, labs: &LatestLabValues, assessment: RiskAssessment) -> Self {
        let EnrichedPatient {
            patient,
            age,
            age_group,
        } = enriched;

        let (glycemic_value, glycemic_date) = match &labs.glycemic {
            Some(lab) => (Some(lab.value), lab.date.clone()),
            None => (None, None),
        };
        let (lipid_value, lipid_date) = match &labs.lipid {
            Some(lab) => (Some(lab.value), lab.date.clone()),
            None => (None, None),
        };

        PatientRiskRecord {
            patient_id: patient.patient_id,
            full_name: patient.full_name,
            family_name: patient.family_name,
            given_name: patient.given_name,
            gender: patient.gender,
            birthdate: patient.birthdate,
            city: patient.city,
            state: patient.state,
            postal_code: patient.postal_code,
            age,
            age_group,
            glycemic_value,
            glycemic_date,
            lipid_value,
            lipid_date,
            diabetes_risk: assessment.diabetes_risk,
            cardiovascular_risk: assessment.cardiovascular_risk,
            risk_score: assessment.risk_score,
            risk_category: assessment.risk_category,
            risk_reasons: assessment.risk_reasons,
        }
    }
}

///
/// Scores every patient, in input order, and summarizes the population.
///
/// Every patient is in the summary denominator, including those without labs.
///
pub fn score_patient_risks(
    data: &ClinicalData,
    rules: &RulesConfig,
    today: NaiveDate,
) -> Result<(Vec<PatientRiskRecord>, RiskSummary), ConfigError> {
    let classifier = RiskClassifier::from_config(rules)?;

    let labs = resolve_latest_labs(&data.observations, rules);
    let no_labs = LatestLabValues::default();

    let records: Vec<PatientRiskRecord> = enrich_patients(&data.patients, today)
        .into_iter()
        .map(|enriched| {
            let patient_labs = labs.get(&enriched.patient.patient_id).unwrap_or(&no_labs);
            let assessment = classifier.classify(patient_labs);
            PatientRiskRecord::new(enriched, patient_labs, assessment)
        })
        .collect();

    let summary = RiskSummary::new(&records, classifier.categories());

    info!(
        target: REPORT,
        msg = "Scored patient risks",
        patients = summary.total_patients,
        diabetes = summary.diabetes_risk_count,
        cardiovascular = summary.cardiovascular_risk_count,
    );

    Ok((records, summary))
}

/// Records with a risk score above zero, highest score first. Equal scores keep input order.
pub fn high_risk(records: &[PatientRiskRecord]) -> Vec<PatientRiskRecord> {
    let mut high_risk: Vec<PatientRiskRecord> = records
        .iter()
        .filter(|r| r.risk_score > 0)
        .cloned()
        .collect();

    high_risk.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    high_risk
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportInfo {
    pub csv_report_path: PathBuf,
    pub json_report_path: PathBuf,
    pub high_risk_count: usize,
    pub total_patients: usize,
    pub risk_summary: RiskSummary,
}

///
/// Writes the CSV and JSON reports into the output directory, creating it.
/// Existing reports are overwritten.
///
pub fn generate_reports(
    data: &ClinicalData,
    rules: &RulesConfig,
    output: &OutputConfig,
    today: NaiveDate,
) -> Result<ReportInfo, Error> {
    write_reports(data, rules, output, today).map(|(info, _)| info)
}

fn write_reports(
    data: &ClinicalData,
    rules: &RulesConfig,
    output: &OutputConfig,
    today: NaiveDate,
) -> Result<(ReportInfo, RiskReport), Error> {
    let (records, summary) = score_patient_risks(data, rules, today)?;
    let high_risk_patients = high_risk(&records);

    fs::create_dir_all(&output.dir).map_err(|source| ReportError::Write {
        path: output.dir.clone(),
        source,
    })?;

    let csv_report_path = output.csv_path();
    csv_file::write(&csv_report_path, &high_risk_patients)?;

    let report = RiskReport {
        report_date: today.format(REPORT_DATE_FORMAT).to_string(),
        summary,
        high_risk_patients,
    };

    let json_report_path = output.json_path();
    json_file::write(&json_report_path, &report)?;

    let info = ReportInfo {
        csv_report_path,
        json_report_path,
        high_risk_count: report.high_risk_patients.len(),
        total_patients: report.summary.total_patients,
        risk_summary: report.summary.clone(),
    };

    info!(
        target: REPORT,
        msg = "Generated reports",
        csv = %info.csv_report_path.display(),
        json = %info.json_report_path.display(),
        high_risk = info.high_risk_count,
        patients = info.total_patients,
    );

    Ok((info, report))
}

///
/// Reads the JSON report when both report files exist, otherwise regenerates
/// them from the configured input first.
///
pub fn load_or_generate(config: &PipelineConfig, today: NaiveDate) -> Result<RiskReport, Error> {
    let csv_path = config.output.csv_path();
    let json_path = config.output.json_path();

    if csv_path.exists() && json_path.exists() {
        debug!(target: REPORT, msg = "Reading existing report", path = %json_path.display());
        return Ok(json_file::read(&json_path)?);
    }

    debug!(target: REPORT, msg = "Reports missing, regenerating", dir = %config.output.dir.display());

    let data = fhir::load(&config.input.path)?;
    let (_, report) = write_reports(&data, &config.rules, &config.output, today)?;

    Ok(report)
}

/// Reads a JSON report written by `generate_reports`.
pub fn read_report(path: &Path) -> Result<RiskReport, ReportError> {
    json_file::read(path)
}
