// error.rs - Error taxonomy shared by every pipeline stage

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HgtError {
    /// A single row failed validation (only surfaced under the strict row policy)
    #[error("Malformed row in '{}' at line {line}: {reason}", path.display())]
    MalformedInput {
        path: PathBuf,
        line: u64,
        reason: String,
    },
    #[error("Table '{}' is missing required column '{column}'", path.display())]
    MissingRequiredColumn { path: PathBuf, column: String },
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read table '{}': {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid FASTA record in '{}': {reason}", path.display())]
    Fasta { path: PathBuf, reason: String },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Failed to serialize run summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl HgtError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HgtError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn table(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        HgtError::Table {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HgtError>;
