mod filter;

use crate::{
    config::{LogConfig, LogFormat, LogLevel, DEFAULT_CONFIG_FILE_PATH},
    error::Error,
    log::DEVELOPMENT,
    pipeline::Pipeline,
    report::{PatientFilter, ReportInfo},
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

pub use filter::Filter;

#[derive(Clone, Debug, Parser)]
#[command(version, about, verbatim_doc_comment)]
///
/// Clinical Risk
///
/// Scores patients in a FHIR-shaped clinical dataset for diabetes and cardiovascular risk
/// and writes CSV and JSON reports of the patients at risk.
///
pub struct Args {
    /// Optional path to a configuration file.
    ///
    /// Default is "clinical-risk.toml".
    /// Configuration is loaded from this file, if present.
    /// Environment variables are used instead of the file or to override any values defined in the file.
    #[arg(short = 'p', long, default_value = DEFAULT_CONFIG_FILE_PATH, verbatim_doc_comment, global = true)]
    pub config_file_path: String,

    ///
    /// Optional log level.
    ///
    #[arg(short, long, value_enum, default_value_t = LogConfig::default_log_level(), env = "CR_LOG__LEVEL", global = true)]
    pub log_level: LogLevel,

    ///
    /// Optional log format. Default level is "pretty" if running in a terminal session, otherwise "structured".
    ///
    #[arg(short='f', long, value_enum, default_value_t = LogConfig::default_log_format(), env = "CR_LOG__FORMAT", global = true)]
    pub log_format: LogFormat,

    ///
    /// Optional path to the input JSON document. Overrides `input.path` from config.
    ///
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Generate the CSV and JSON reports and print a summary. This is the default.
    Report,
    /// Print the risk summary for all patients as JSON
    Score,
    /// Print population demographics as JSON
    Demographics,
    /// Print entity counts for the input document
    Load,
    Filter(Filter),
}

///
/// Runs the command specified on the command line, `report` if none.
/// Command output goes to stdout.
///
pub fn run(args: Args, pipeline: Pipeline) -> Result<(), Error> {
    let command = args.command.unwrap_or(Commands::Report);
    debug!(target: DEVELOPMENT, ?command);

    let mut out = io::stdout().lock();

    match command {
        Commands::Report => {
            let info = pipeline.generate_reports()?;
            write_report_info(&mut out, &info)?;
        }
        Commands::Score => {
            let (_, summary) = pipeline.score()?;
            write_json(&mut out, &summary)?;
        }
        Commands::Demographics => {
            let demographics = pipeline.demographics()?;
            write_json(&mut out, &demographics)?;
        }
        Commands::Load => {
            let data = pipeline.load()?;
            writeln!(out, "Patients: {}", data.patients.len())?;
            writeln!(
                out,
                "Observations: {} ({} unresolved)",
                data.observations.len(),
                data.unresolved_observations()
            )?;
            writeln!(
                out,
                "Medications: {} ({} unresolved)",
                data.medications.len(),
                data.unresolved_medications()
            )?;
            writeln!(
                out,
                "Allergies: {} ({} unresolved)",
                data.allergies.len(),
                data.unresolved_allergies()
            )?;
        }
        Commands::Filter(filter) => {
            let records = pipeline.filter(&PatientFilter::from(&filter))?;
            write_json(&mut out, &records)?;
        }
    }

    Ok(())
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_report_info<W: Write>(out: &mut W, info: &ReportInfo) -> Result<(), Error> {
    let summary = &info.risk_summary;

    writeln!(
        out,
        "Generated reports for {} high-risk patients out of {} total patients",
        info.high_risk_count, info.total_patients
    )?;
    writeln!(out, "CSV Report: {}", info.csv_report_path.display())?;
    writeln!(out, "JSON Report: {}", info.json_report_path.display())?;
    writeln!(out)?;
    writeln!(out, "Risk Summary:")?;
    writeln!(
        out,
        "Diabetes Risk: {} patients ({:.1}%)",
        summary.diabetes_risk_count, summary.diabetes_risk_percentage
    )?;
    writeln!(
        out,
        "Cardiovascular Risk: {} patients ({:.1}%)",
        summary.cardiovascular_risk_count, summary.cardiovascular_risk_percentage
    )?;
    for (category, count) in &summary.risk_category_counts {
        writeln!(out, "{category}: {count}")?;
    }

    Ok(())
}
