//! `Classifier`'s error taxonomy, mapped into [`nldb_core::AppError`].

use nldb_core::AppError;
use nldb_llm::LlmError;
use thiserror::Error;

/// Failure modes of a general-chat reply call.
///
/// `requiresQueryGeneration` never surfaces this: it fails closed to
/// `false` instead of propagating an error.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The language-model collaborator could not be reached, or the call
    /// did not complete within the per-call timeout.
    #[error("classifier upstream unavailable: {0}")]
    Unavailable(String),
}

impl From<ClassifierError> for AppError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Unavailable(reason) => AppError::UpstreamUnavailable(reason),
        }
    }
}

/// True for error kinds worth retrying once (transient transport failures);
/// false for anything that would fail the same way again.
pub(crate) fn llm_error_to_app_error(err: LlmError) -> AppError {
    match err {
        LlmError::HttpError(_) | LlmError::ApiRequestFailed(_) | LlmError::RateLimitExceeded { .. } => {
            AppError::UpstreamUnavailable(err.to_string())
        }
        other => AppError::Internal(other.to_string()),
    }
}

/// Result type returned by [`crate::Classifier::respond_general`].
pub type ClassifierResult<T> = Result<T, ClassifierError>;
