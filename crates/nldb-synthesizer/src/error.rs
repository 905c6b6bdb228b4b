//! `QuerySynthesizer`'s error taxonomy, mapped into [`nldb_core::AppError`].

use nldb_core::AppError;
use nldb_llm::LlmError;
use thiserror::Error;

/// Failure modes of a synthesis call.
#[derive(Debug, Error)]
pub enum SynthesizerError {
    /// The language-model collaborator could not be reached, or the call
    /// did not complete within the per-call timeout. Retried once before
    /// surfacing.
    #[error("synthesizer upstream unavailable: {0}")]
    Unavailable(String),
    /// The model responded but produced no usable query or explanation.
    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),
}

impl From<SynthesizerError> for AppError {
    fn from(err: SynthesizerError) -> Self {
        match err {
            SynthesizerError::Unavailable(reason) => AppError::UpstreamUnavailable(reason),
            SynthesizerError::SynthesisFailed(reason) => AppError::SynthesisFailed(reason),
        }
    }
}

pub(crate) fn llm_error_to_app_error(err: LlmError) -> AppError {
    match err {
        LlmError::HttpError(_) | LlmError::ApiRequestFailed(_) | LlmError::RateLimitExceeded { .. } => {
            AppError::UpstreamUnavailable(err.to_string())
        }
        other => AppError::Internal(other.to_string()),
    }
}

/// Result type returned by [`crate::QuerySynthesizer::synthesize`].
pub type SynthesizerResult<T> = Result<T, SynthesizerError>;
