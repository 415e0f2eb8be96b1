use crate::extract::ExtractKind;
use std::path::PathBuf;
use thiserror::Error;

/// Schema problems found while validating an extract at the engine boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected columns not found in {extract}: {}", fields.join(", "))]
    MissingFields { extract: String, fields: Vec<String> },

    #[error("value column not found in {extract} (expected one of: {})", candidates.join(", "))]
    ValueColumnNotDetected {
        extract: String,
        candidates: Vec<String>,
    },
}

impl SchemaError {
    /// Fields the caller has to add to the extract for the report to run.
    pub fn missing_fields(&self) -> &[String] {
        match self {
            SchemaError::MissingFields { fields, .. } => fields,
            SchemaError::ValueColumnNotDetected { candidates, .. } => candidates,
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Schema validation failed: {0}")]
    SchemaValidation(#[from] SchemaError),

    #[error("Extract {0} was not loaded for this report")]
    ExtractNotLoaded(ExtractKind),

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::prelude::PolarsError> for ReportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ReportError::Polars(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
