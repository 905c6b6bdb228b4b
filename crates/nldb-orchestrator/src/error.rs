//! `Orchestrator`'s own error taxonomy, mapped into [`nldb_core::AppError`]
//! at the boundary.

use nldb_core::AppError;
use thiserror::Error;

/// Failure modes specific to the turn pipeline, distinct from the errors its
/// collaborators (`Classifier`, `QuerySynthesizer`, `QueryExecutor`) already
/// convert into [`AppError`] themselves.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The turn classified as query-intent but no connection is bound to
    /// the session it arrived on.
    #[error("no active connection is bound to this session")]
    NoActiveConnection,
}

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::NoActiveConnection => {
                AppError::Validation("no active connection is bound to this session".to_string())
            }
        }
    }
}
