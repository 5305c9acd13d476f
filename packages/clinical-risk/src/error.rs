use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Expected {expected} risk categories for {rules} rules, found {found}")]
    CategoryMappingMismatch {
        rules: usize,
        expected: usize,
        found: usize,
    },

    #[error("Risk category {label} is mapped to more than one score")]
    DuplicateCategory { label: String },

    #[error("Lab test name for {name} must not be empty")]
    EmptyTestName { name: String },

    #[error("Invalid value {value} for field {name}")]
    InvalidParameter { name: String, value: String },

    #[error("Threshold {name} must be a positive number, found {value}")]
    InvalidThreshold { name: String, value: f64 },

    #[error(transparent)]
    FileOrEnvironment(#[from] config::ConfigError),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input file {} could not be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Input is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Input document must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Top-level collection {collection} must be an array, found {found}")]
    CollectionNotAnArray {
        collection: &'static str,
        found: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Report {} could not be written: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Report {} could not be read: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.into())
    }
}

/// Serialization failures outside of loading are output failures.
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Report(e.into())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Report(e.into())
    }
}

impl Error {
    ///
    /// Process exit code for this error, as used by the binary
    ///
    pub fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Error::Config(_) => exitcode::CONFIG,
            Error::Io(_) => exitcode::IOERR,
            Error::Load(LoadError::Unreadable { .. }) => exitcode::NOINPUT,
            Error::Load(_) => exitcode::DATAERR,
            Error::Report(ReportError::Read { .. }) => exitcode::NOINPUT,
            Error::Report(_) => exitcode::CANTCREAT,
        }
    }
}
