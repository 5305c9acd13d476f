use super::{InputConfig, LogConfig, OutputConfig, RulesConfig, CR_PREFIX};
use crate::error::{ConfigError, Error};
use crate::log::CONFIG;
use crate::Args;
use config::{Config, Environment};
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Config defaults to a file called `clinical-risk.toml` in the current directory.
/// Supports TOML and JSON.
/// Variable names should match the struct field names.
///
/// ENV vars can be used to override file settings.
///
/// ENV vars must be prefixed with `CR_`, nested values use `__`, eg `CR_RULES__LIPID_THRESHOLD`.
///
impl PipelineConfig {
    pub fn load(args: &Args) -> Result<PipelineConfig, Error> {
        // Stdout carries command output, so notices go to stderr
        if !PathBuf::from(&args.config_file_path).exists() {
            eprintln!(
                "Configuration file was not found: {}",
                args.config_file_path
            );
            eprintln!("Loading config values from defaults and environment variables.");
        }
        let mut config = PipelineConfig::build(&args.config_file_path)?;

        // If log level is default, it has not been set by the user in config
        if config.log.level == LogConfig::default_log_level() {
            config.log.override_level(args.log_level);
        }

        // If log format is default, it has not been set by the user in config
        if config.log.format == LogConfig::default_log_format() {
            config.log.format = args.log_format;
        }

        if let Some(input) = &args.input {
            config.input.path = input.to_owned();
        }

        Ok(config)
    }

    pub fn build(path: &str) -> Result<Self, Error> {
        // For parsing nested env values such as CR_INPUT__PATH, CR_RULES__GLYCEMIC_THRESHOLD
        let cr_env_source = Environment::with_prefix(CR_PREFIX)
            .try_parsing(true)
            .separator("__")
            .prefix_separator("_");

        let config: Self = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(cr_env_source)
            .build()?
            .try_deserialize()
            .map_err(|err| match err {
                config::ConfigError::Message(ref s)
                    if s.contains("does not have variant constructor") =>
                {
                    let (name, value) = extract_invalid_field(s);
                    ConfigError::InvalidParameter { name, value }
                }
                _ => err.into(),
            })?;

        config.rules.validate()?;

        debug!(target: CONFIG, msg = "Configuration loaded", ?config);

        Ok(config)
    }
}

///
/// Extracts the enum name and rejected value from a config::ConfigError::Message
/// This is called in `build` if a ConfigError message contains the string `does not have variant constructor`
///
/// Error string is `enum {name} does not have variant constructor {value}`
///
fn extract_invalid_field(input: &str) -> (String, String) {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^enum (\S+) does not have variant constructor (\S*)").unwrap()
    });

    RE.captures(input)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .unwrap_or_else(|| ("unknown".to_string(), "".to_string()))
}

#[cfg(test)]
mod tests {
    use super::extract_invalid_field;
    use crate::test_helpers::with_no_cr_vars;
    use crate::{
        config::{PipelineConfig, DEFAULT_GLYCEMIC_THRESHOLD, DEFAULT_LIPID_THRESHOLD},
        error::{ConfigError, Error},
    };
    use std::path::PathBuf;

    const TEST_CONFIG: &str = "tests/config/clinical-risk-test.toml";

    #[test]
    fn missing_file_uses_defaults() {
        with_no_cr_vars(|| {
            let config = PipelineConfig::build("tests/config/does-not-exist.toml").unwrap();

            assert_eq!(
                config.input.path,
                PathBuf::from("data/fhir_sample_data.json")
            );
            assert_eq!(
                config.output.csv_path(),
                PathBuf::from("outputs/high_risk_report.csv")
            );
            assert_eq!(config.rules.glycemic_threshold, DEFAULT_GLYCEMIC_THRESHOLD);
            assert_eq!(config.rules.lipid_threshold, DEFAULT_LIPID_THRESHOLD);
        });
    }

    #[test]
    fn file_values_are_loaded() {
        with_no_cr_vars(|| {
            let config = PipelineConfig::build(TEST_CONFIG).unwrap();

            assert_eq!(config.input.path, PathBuf::from("tests/data/fhir_sample.json"));
            assert_eq!(config.output.dir, PathBuf::from("target/test-outputs"));
            assert_eq!(config.rules.lipid_test, "cholesterol");
        });
    }

    #[test]
    fn env_overrides_thresholds() {
        with_no_cr_vars(|| {
            temp_env::with_vars(
                [
                    ("CR_RULES__GLYCEMIC_THRESHOLD", Some("7.5")),
                    ("CR_RULES__LIPID_THRESHOLD", Some("200")),
                ],
                || {
                    let config = PipelineConfig::build(TEST_CONFIG).unwrap();
                    assert_eq!(config.rules.glycemic_threshold, 7.5);
                    assert_eq!(config.rules.lipid_threshold, 200.0);
                },
            );
        });
    }

    #[test]
    fn env_overrides_input_path() {
        with_no_cr_vars(|| {
            temp_env::with_vars([("CR_INPUT__PATH", Some("elsewhere.json"))], || {
                let config = PipelineConfig::build(TEST_CONFIG).unwrap();
                assert_eq!(config.input.path, PathBuf::from("elsewhere.json"));
            });
        });
    }

    #[test]
    fn invalid_threshold_is_a_config_error() {
        with_no_cr_vars(|| {
            temp_env::with_vars([("CR_RULES__LIPID_THRESHOLD", Some("-1"))], || {
                let config = PipelineConfig::build(TEST_CONFIG);

                assert!(matches!(
                    config.unwrap_err(),
                    Error::Config(ConfigError::InvalidThreshold { .. })
                ));
            });
        });
    }

    #[test]
    fn extracts_invalid_enum_field() {
        let (name, value) =
            extract_invalid_field("enum LogLevel does not have variant constructor dEbUG");
        assert_eq!(name, "LogLevel");
        assert_eq!(value, "dEbUG");

        let (name, value) = extract_invalid_field("something else entirely");
        assert_eq!(name, "unknown");
        assert_eq!(value, "");
    }
}
