use crate::config::PipelineConfig;
use crate::demographics::{demographics, Demographics};
use crate::enrich::enrich_patients;
use crate::error::Error;
use crate::fhir::{self, ClinicalData};
use crate::report::{
    self, high_risk, PatientFilter, PatientRiskRecord, ReportInfo, RiskReport, RiskSummary,
};
use crate::risk::RiskClassifier;
use chrono::{Local, NaiveDate};

///
/// The batch pipeline for one configuration and one processing date.
///
/// Every operation reloads the input file, so results always reflect the file on disk.
///
#[derive(Clone, Debug)]
pub struct Pipeline {
    pub config: PipelineConfig,
    pub today: NaiveDate,
}

impl Pipeline {
    /// Fails on invalid risk rules before any input is read.
    pub fn init(config: PipelineConfig, today: NaiveDate) -> Result<Self, Error> {
        RiskClassifier::from_config(&config.rules)?;
        Ok(Pipeline { config, today })
    }

    /// Processing date is the local date.
    pub fn for_today(config: PipelineConfig) -> Result<Self, Error> {
        Pipeline::init(config, Local::now().date_naive())
    }

    pub fn load(&self) -> Result<ClinicalData, Error> {
        Ok(fhir::load(&self.config.input.path)?)
    }

    pub fn score(&self) -> Result<(Vec<PatientRiskRecord>, RiskSummary), Error> {
        let data = self.load()?;
        Ok(report::score_patient_risks(
            &data,
            &self.config.rules,
            self.today,
        )?)
    }

    pub fn demographics(&self) -> Result<Demographics, Error> {
        let data = self.load()?;
        Ok(demographics(&enrich_patients(&data.patients, self.today)))
    }

    pub fn generate_reports(&self) -> Result<ReportInfo, Error> {
        let data = self.load()?;
        report::generate_reports(&data, &self.config.rules, &self.config.output, self.today)
    }

    pub fn load_or_generate(&self) -> Result<RiskReport, Error> {
        report::load_or_generate(&self.config, self.today)
    }

    /// High-risk records from the current reports that match `filter`.
    pub fn filter(&self, filter: &PatientFilter) -> Result<Vec<PatientRiskRecord>, Error> {
        let report = self.load_or_generate()?;
        Ok(filter
            .apply(&report.high_risk_patients)
            .into_iter()
            .cloned()
            .collect())
    }

    /// High-risk records computed from the input without touching the report files.
    pub fn high_risk(&self) -> Result<Vec<PatientRiskRecord>, Error> {
        let (records, _) = self.score()?;
        Ok(high_risk(&records))
    }
}
