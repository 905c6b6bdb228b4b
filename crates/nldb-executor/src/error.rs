//! `QueryExecutor`'s error taxonomy, mapped into [`nldb_core::AppError`].

use nldb_core::AppError;
use thiserror::Error;

/// Failure modes of an `execute`/`validate` call.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The query matched the denylist and was not sent to the driver.
    /// Carries the offending keyword.
    #[error("query blocked: matched denylisted keyword '{0}'")]
    Blocked(String),
    /// `connection_id` has no live driver handle.
    #[error("connection not live")]
    NotFound,
    /// The driver raised an error running the query. The message is
    /// scrubbed of credentials before it reaches this variant.
    #[error("driver error: {0}")]
    DriverError(String),
}

impl From<ExecutorError> for AppError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Blocked(keyword) => AppError::Blocked(keyword),
            ExecutorError::NotFound => AppError::NotFound("connection not live".to_string()),
            ExecutorError::DriverError(message) => AppError::DriverError(message),
        }
    }
}

/// Result type returned by [`crate::QueryExecutor::execute`] and
/// [`crate::QueryExecutor::validate`].
pub type ExecutorResult<T> = Result<T, ExecutorError>;
