use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("External resource not ready within {timeout:?}")]
    ReadinessTimeout { timeout: Duration },

    #[error("Payload schema mismatch at field: {field}")]
    SchemaMismatch { field: String },

    #[error("Artifact processing failed: {0}")]
    Artifact(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database operation failed: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Validation query failed: {0}")]
    Validation(#[source] rusqlite::Error),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Direct fetch returned status {status}")]
    DirectFetchFailed { status: u16 },

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Pipeline run produced no validation report")]
    MissingValidationReport,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
