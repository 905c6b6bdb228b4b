//! `ConnectionManager`'s own error taxonomy, mapped into
//! [`nldb_core::AppError`] at the boundary.

use nldb_core::AppError;
use thiserror::Error;

/// Failure modes of `ConnectionManager` operations.
#[derive(Debug, Error)]
pub enum ConnectionManagerError {
    /// `establish` was called with a name already active for this user.
    #[error("connection name already in use")]
    DuplicateName,
    /// `establish` or `test` was called with a precondition violated: an
    /// empty required field or a zero port.
    #[error("invalid connection parameters: {0}")]
    Unsupported(String),
    /// The driver could not be opened against the target server.
    #[error("unreachable: {0}")]
    Unreachable(String),
    /// The referenced connection does not exist, is not owned by the
    /// caller, or is soft-deleted.
    #[error("connection not found")]
    NotFound,
    /// The control-plane store could not be reached.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<ConnectionManagerError> for AppError {
    fn from(err: ConnectionManagerError) -> Self {
        match err {
            ConnectionManagerError::DuplicateName => {
                AppError::Duplicate("connection name".to_string())
            }
            ConnectionManagerError::Unsupported(kind) => AppError::Validation(kind),
            ConnectionManagerError::Unreachable(reason) => AppError::Unreachable(reason),
            ConnectionManagerError::NotFound => AppError::NotFound("connection".to_string()),
            ConnectionManagerError::StorageUnavailable(reason) => AppError::Unreachable(reason),
        }
    }
}

/// Result type returned by every `ConnectionManager` operation.
pub type ConnectionManagerResult<T> = Result<T, ConnectionManagerError>;
