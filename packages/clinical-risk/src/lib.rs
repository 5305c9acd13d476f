pub mod cli;
pub mod config;
pub mod demographics;
pub mod enrich;
pub mod error;
pub mod fhir;
pub mod labs;
pub mod log;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod risk;

pub use crate::cli::Args;
pub use crate::config::PipelineConfig;
pub use crate::log::init;
pub use crate::pipeline::Pipeline;
pub use crate::report::{score_patient_risks, PatientFilter, PatientRiskRecord, RiskSummary};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
pub mod test_helpers;
