//! Error types for survey ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading survey input.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The CSV file could not be opened or a record could not be decoded.
    #[error("failed to read CSV {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The input has no header row.
    #[error("CSV {} has no header row", path.display())]
    MissingHeader { path: PathBuf },

    /// A form assignment named a field outside the canonical schema.
    #[error(transparent)]
    UnknownField(#[from] cvs_model::ModelError),

    /// A form assignment was not of the form `field=value`.
    #[error("expected FIELD=VALUE, got '{0}'")]
    MalformedAssignment(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
