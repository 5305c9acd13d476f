mod log;
mod paths;
mod pipeline;
mod rules;

pub use log::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use paths::{InputConfig, OutputConfig};
pub use pipeline::PipelineConfig;
pub use rules::{
    RulesConfig, DEFAULT_GLYCEMIC_TEST, DEFAULT_GLYCEMIC_THRESHOLD, DEFAULT_LIPID_TEST,
    DEFAULT_LIPID_THRESHOLD,
};

pub const CR_PREFIX: &str = "CR";
pub const DEFAULT_CONFIG_FILE_PATH: &str = "clinical-risk.toml";

pub const DEFAULT_INPUT_PATH: &str = "data/fhir_sample_data.json";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_CSV_FILE: &str = "high_risk_report.csv";
pub const DEFAULT_JSON_FILE: &str = "high_risk_report.json";
