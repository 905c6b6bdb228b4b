//! `Classifier`: decides whether a user turn needs database access, and
//! produces the reply when it doesn't.

use std::sync::Arc;
use std::time::Duration;

use nldb_core::{retry, RetryConfig};
use nldb_llm::LlmProvider;

use crate::error::{llm_error_to_app_error, ClassifierError, ClassifierResult};

/// Per-call timeout mandated by the contract: both `requiresQueryGeneration`
/// and `respondGeneral` are bounded by this, retried at most once on
/// transient transport errors.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(8);

const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Decides query-intent vs. general chat, backed by a single LLM provider.
pub struct Classifier {
    provider: Arc<dyn LlmProvider>,
    call_timeout: Duration,
}

impl Classifier {
    /// Build a `Classifier` over `provider` using the default per-call
    /// timeout.
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

    /// Whether `text` expresses intent to query a database.
    ///
    /// Fails closed: any timeout, transport error, or unparseable reply
    /// returns `false` rather than propagating an error, since a false
    /// negative here only costs a missed query while a false positive would
    /// route free-form text into query synthesis.
    pub async fn requires_query_generation(&self, text: &str) -> bool {
        let prompt = classification_prompt(text);
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

        match tokio::time::timeout(self.call_timeout, attempt).await {
            Ok(Ok((reply, _))) => parse_intent_reply(&reply),
            Ok(Err(_)) | Err(_) => false,
        }
    }

    /// Produce a conversational reply to `text`.
    ///
    /// `user_id`/`session_id` are accepted for prompt personalization and
    /// audit logging; the current prompt does not yet use them.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Unavailable`] if the provider could not be
    /// reached within the timeout, including after one retry.
    pub async fn respond_general(
        &self,
        text: &str,
        _user_id: nldb_core::UserId,
        _session_id: nldb_core::SessionId,
    ) -> ClassifierResult<String> {
        let prompt = general_chat_prompt(text);
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

        match tokio::time::timeout(self.call_timeout, attempt).await {
            Ok(Ok((reply, _))) => Ok(reply),
            Ok(Err(err)) => Err(ClassifierError::Unavailable(err.to_string())),
            Err(_) => Err(ClassifierError::Unavailable(
                "classifier call timed out".to_string(),
            )),
        }
    }
}

fn classification_prompt(text: &str) -> String {
    format!(
        "Decide whether the following user message requests information from a \
         database (answer with exactly one word, \"true\" or \"false\"):\n\n{text}"
    )
}

fn general_chat_prompt(text: &str) -> String {
    format!("Respond conversationally to the following user message:\n\n{text}")
}

fn parse_intent_reply(reply: &str) -> bool {
    reply.trim().to_ascii_lowercase().starts_with("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_core::{SessionId, UserId};
    use nldb_test::mock_llm::{MockLlmProvider, ScriptedReply};

    fn classifier_with(reply: &str) -> Classifier {
        let provider = Arc::new(MockLlmProvider::new().with_reply(ScriptedReply::text(reply)));
        Classifier::new(provider).with_call_timeout(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn requires_query_generation_parses_true() {
        let classifier = classifier_with("true");
        assert!(classifier.requires_query_generation("list all orders").await);
    }

    #[tokio::test]
    async fn requires_query_generation_parses_false() {
        let classifier = classifier_with("false");
        assert!(!classifier.requires_query_generation("hello there").await);
    }

    #[tokio::test]
    async fn requires_query_generation_fails_closed_on_unparseable_reply() {
        let classifier = classifier_with("I'm not sure what you mean");
        assert!(!classifier.requires_query_generation("??").await);
    }

    #[tokio::test]
    async fn respond_general_returns_provider_reply() {
        let classifier = classifier_with("Hello! How can I help?");
        let reply = classifier
            .respond_general("hi", UserId::new(), SessionId::new())
            .await
            .unwrap();
        assert_eq!(reply, "Hello! How can I help?");
    }
}
