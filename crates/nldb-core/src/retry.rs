//! Retry-once policy for upstream collaborator calls.
//!
//! The Classifier and QuerySynthesizer retry exactly once when an upstream
//! collaborator reports [`AppError::UpstreamUnavailable`]; no other error
//! kind is retried.

use crate::error::AppError;
use std::future::Future;

/// Configuration for a bounded retry policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before a retry attempt.
    pub backoff: std::time::Duration,
}

impl RetryConfig {
    /// The retry-once policy mandated for Classifier and QuerySynthesizer.
    #[must_use]
    pub const fn retry_once(backoff: std::time::Duration) -> Self {
        Self {
            max_attempts: 2,
            backoff,
        }
    }
}

/// The outcome of a retried operation: whether it succeeded on the first try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Succeeded without needing a retry.
    FirstTry,
    /// Succeeded after one retry.
    Retried,
}

/// Run `op` under `config`, retrying only on [`AppError::UpstreamUnavailable`].
///
/// # Errors
///
/// Returns the last error if every attempt fails, or immediately on any
/// error kind other than `UpstreamUnavailable`.
pub async fn retry<T, F, Fut>(config: RetryConfig, mut op: F) -> Result<(T, RetryOutcome), AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => {
                let outcome = if attempt == 1 {
                    RetryOutcome::FirstTry
                } else {
                    RetryOutcome::Retried
                };
                return Ok((value, outcome));
            }
            Err(AppError::UpstreamUnavailable(reason)) if attempt < config.max_attempts => {
                tracing::warn!(attempt, %reason, "upstream unavailable, retrying");
                tokio::time::sleep(config.backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}
