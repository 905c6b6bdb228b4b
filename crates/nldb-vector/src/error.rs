//! `VectorIndex`'s error taxonomy, mapped into [`nldb_core::AppError`].

use nldb_core::AppError;
use thiserror::Error;

/// Failure modes of `VectorIndex`/`VectorStore` operations.
#[derive(Debug, Error)]
pub enum VectorError {
    /// The query vector's dimension did not match the deployment's fixed `D`.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The deployment's fixed embedding dimension.
        expected: usize,
        /// The dimension of the vector actually supplied.
        actual: usize,
    },
    /// The backing store could not be reached.
    #[error("vector store unavailable: {0}")]
    Unavailable(String),
}

impl From<VectorError> for AppError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::DimensionMismatch { .. } => AppError::Validation(err.to_string()),
            VectorError::Unavailable(reason) => AppError::Unreachable(reason),
        }
    }
}

/// Result type returned by every `VectorIndex`/`VectorStore` operation.
pub type VectorResult<T> = Result<T, VectorError>;
