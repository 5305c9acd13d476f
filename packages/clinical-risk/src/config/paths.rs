use super::{DEFAULT_CSV_FILE, DEFAULT_INPUT_PATH, DEFAULT_JSON_FILE, DEFAULT_OUTPUT_DIR};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_path")]
    pub path: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_dir")]
    pub dir: PathBuf,

    #[serde(default = "OutputConfig::default_csv_file")]
    pub csv_file: String,

    #[serde(default = "OutputConfig::default_json_file")]
    pub json_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            path: InputConfig::default_path(),
        }
    }
}

impl InputConfig {
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_INPUT_PATH)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: OutputConfig::default_dir(),
            csv_file: OutputConfig::default_csv_file(),
            json_file: OutputConfig::default_json_file(),
        }
    }
}

impl OutputConfig {
    pub fn default_dir() -> PathBuf {
        PathBuf::from(DEFAULT_OUTPUT_DIR)
    }

    pub fn default_csv_file() -> String {
        DEFAULT_CSV_FILE.to_string()
    }

    pub fn default_json_file() -> String {
        DEFAULT_JSON_FILE.to_string()
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(&self.csv_file)
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(&self.json_file)
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        OutputConfig {
            dir: dir.into(),
            ..Default::default()
        }
    }
}
