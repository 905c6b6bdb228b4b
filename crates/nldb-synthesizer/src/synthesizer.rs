//! `QuerySynthesizer`: turns a natural-language question plus schema
//! context into dialect-specific query text. Never executes the query.

use std::sync::Arc;
use std::time::Duration;

use nldb_core::{retry, DatabaseKind, RetryConfig, SessionId, UserId};
use nldb_llm::LlmProvider;
use serde::Deserialize;

use crate::error::{llm_error_to_app_error, SynthesizerError, SynthesizerResult};
use crate::prompt::{synthesis_prompt, ContextTable};

/// Per-call timeout, matching the Classifier's contract.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(8);

const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// A synthesized query and its plain-language explanation. Both fields are
/// guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOutput {
    /// Query text conforming to the requested `DatabaseKind`'s grammar.
    pub query: String,
    /// Short natural-language explanation of what the query does.
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
struct RawSynthesis {
    #[serde(default)]
    query: String,
    #[serde(default)]
    explanation: String,
}

/// Translates {question, database kind, context tables} into query text.
pub struct QuerySynthesizer {
    provider: Arc<dyn LlmProvider>,
    call_timeout: Duration,
}

impl QuerySynthesizer {
    /// Build a `QuerySynthesizer` over `provider` using the default
    /// per-call timeout.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout (tests use a much shorter one).
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Synthesize a query for `user_text` against `kind`, constrained to
    /// `context`.
    ///
    /// `user_id`/`session_id` are accepted for audit logging; the current
    /// prompt does not use them directly.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesizerError::Unavailable`] if the provider could not
    /// be reached within the timeout (after one retry), or
    /// [`SynthesizerError::SynthesisFailed`] if the model's reply did not
    /// contain a usable, non-empty query and explanation.
    pub async fn synthesize(
        &self,
        user_text: &str,
        kind: DatabaseKind,
        context: &[ContextTable],
        _user_id: UserId,
        _session_id: SessionId,
    ) -> SynthesizerResult<SynthesisOutput> {
        let prompt = synthesis_prompt(user_text, kind, context);
        let provider = Arc::clone(&self.provider);
        let attempt = retry(RetryConfig::retry_once(RETRY_BACKOFF), || {
            let provider = Arc::clone(&provider);
            let prompt = prompt.clone();
            async move {
                provider
                    .complete_simple(&prompt)
                    .await
                    .map_err(llm_error_to_app_error)
            }
        });

        let reply = match tokio::time::timeout(self.call_timeout, attempt).await {
            Ok(Ok((reply, _))) => reply,
            Ok(Err(err)) => return Err(SynthesizerError::Unavailable(err.to_string())),
            Err(_) => {
                return Err(SynthesizerError::Unavailable(
                    "synthesizer call timed out".to_string(),
                ))
            }
        };

        parse_synthesis(&reply)
    }
}

fn parse_synthesis(reply: &str) -> SynthesizerResult<SynthesisOutput> {
    let trimmed = extract_json_object(reply);
    let parsed: RawSynthesis = serde_json::from_str(trimmed)
        .map_err(|err| SynthesizerError::SynthesisFailed(format!("unparseable reply: {err}")))?;

    if parsed.query.trim().is_empty() || parsed.explanation.trim().is_empty() {
        return Err(SynthesizerError::SynthesisFailed(
            "model returned an empty query or explanation".to_string(),
        ));
    }

    Ok(SynthesisOutput {
        query: parsed.query,
        explanation: parsed.explanation,
    })
}

/// Some providers wrap JSON in prose or a code fence; take the outermost
/// `{...}` span rather than requiring an exact match.
fn extract_json_object(reply: &str) -> &str {
    let start = reply.find('{');
    let end = reply.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    }
}
