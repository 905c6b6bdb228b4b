//! `GraphIndex`'s error taxonomy, mapped into [`nldb_core::AppError`].

use nldb_core::AppError;
use thiserror::Error;

/// Failure modes of `GraphIndex`/`GraphStore` operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The backing store could not be reached.
    #[error("graph store unavailable: {0}")]
    Unavailable(String),
}

impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Unavailable(reason) => AppError::Unreachable(reason),
        }
    }
}

/// Result type returned by every `GraphIndex`/`GraphStore` operation.
pub type GraphResult<T> = Result<T, GraphError>;
