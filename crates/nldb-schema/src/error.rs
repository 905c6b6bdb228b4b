//! `SchemaIngestor`'s error taxonomy, mapped into [`nldb_core::AppError`].

use nldb_core::AppError;
use thiserror::Error;

/// Failure modes of a whole-connection ingestion run.
#[derive(Debug, Error)]
pub enum SchemaIngestorError {
    /// The driver could not be reached at all (as opposed to a single
    /// table failing, which is logged and skipped per table).
    #[error("driver unreachable: {0}")]
    DriverUnreachable(String),
    /// The embedding collaborator could not be reached.
    #[error("embedding model unavailable: {0}")]
    EmbeddingUnavailable(String),
}

impl From<SchemaIngestorError> for AppError {
    fn from(err: SchemaIngestorError) -> Self {
        match err {
            SchemaIngestorError::DriverUnreachable(reason)
            | SchemaIngestorError::EmbeddingUnavailable(reason) => AppError::Unreachable(reason),
        }
    }
}

/// Result type returned by [`crate::SchemaIngestor::ingest`].
pub type SchemaIngestorResult<T> = Result<T, SchemaIngestorError>;
