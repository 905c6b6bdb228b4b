//! Scriptable mock implementations of the `nldb-llm` traits.

use std::sync::Mutex;

use async_trait::async_trait;
use nldb_llm::{EmbeddingModel, LlmError, LlmProvider, LlmResponse, LlmResult, Message, StopReason, Usage};

/// A canned reply for [`MockLlmProvider`] to return in order.
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    /// Text of the assistant reply.
    pub text: String,
    /// Stop reason to report.
    pub stop_reason: StopReason,
}

impl ScriptedReply {
    /// A plain text reply that ends the turn normally.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stop_reason: StopReason::EndTurn,
        }
    }
}

/// Mock [`LlmProvider`] that returns pre-scripted replies in FIFO order and
/// records every prompt it was called with.
///
/// Calling past the end of the script repeats the final reply, so a test
/// that scripts one reply but triggers two calls still gets sane output
/// rather than a panic.
pub struct MockLlmProvider {
    name: String,
    model: String,
    script: Mutex<Vec<ScriptedReply>>,
    calls: Mutex<Vec<String>>,
}

impl MockLlmProvider {
    /// Create a provider with no scripted replies (every call returns an
    /// empty `EndTurn` response).
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            model: "mock-model".to_string(),
            script: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply to be returned on the next call.
    #[must_use]
    pub fn with_reply(self, reply: ScriptedReply) -> Self {
        self.script.lock().unwrap().push(reply);
        self
    }

    /// Number of times `complete` was invoked.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The system prompts/messages passed to every call, in order, flattened
    /// to their text content.
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> ScriptedReply {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else if let Some(last) = script.last() {
            last.clone()
        } else {
            ScriptedReply::text(String::new())
        }
    }

    fn record(&self, messages: &[Message]) {
        let flattened = messages
            .iter()
            .filter_map(|m| m.text().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join("\n");
        self.calls.lock().unwrap().push(flattened);
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message], _system: &str) -> LlmResult<LlmResponse> {
        self.record(messages);
        let reply = self.next_reply();
        Ok(LlmResponse {
            message: Message::assistant(reply.text),
            stop_reason: reply.stop_reason,
            usage: Usage::default(),
        })
    }

    fn max_context_length(&self) -> usize {
        32_768
    }
}

/// Mock [`EmbeddingModel`] that returns a deterministic low-dimensional
/// vector derived from the input's length and byte sum, so distinct inputs
/// reliably produce distinct vectors without calling out to a real model.
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    /// Create an embedder with the given vector width.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl EmbeddingModel for MockEmbedder {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        if text.is_empty() {
            return Err(LlmError::InvalidResponse("cannot embed empty text".to_string()));
        }
        let byte_sum: u32 = text.bytes().map(u32::from).sum();
        #[allow(clippy::cast_precision_loss)]
        let base = (text.len() as f32) + (byte_sum as f32 / 255.0);
        #[allow(clippy::cast_precision_loss)]
        Ok((0..self.dimensions)
            .map(|i| base / (i as f32 + 1.0))
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_provider_returns_scripted_reply() {
        let provider = MockLlmProvider::new().with_reply(ScriptedReply::text("42"));
        let response = provider.complete_simple("what is the answer?").await.unwrap();
        assert_eq!(response, "42");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn mock_provider_repeats_last_reply_past_script_end() {
        let provider = MockLlmProvider::new().with_reply(ScriptedReply::text("only reply"));
        let first = provider.complete_simple("one").await.unwrap();
        let second = provider.complete_simple("two").await.unwrap();
        assert_eq!(first, "only reply");
        assert_eq!(second, "only reply");
    }

    #[tokio::test]
    async fn mock_embedder_is_deterministic() {
        let embedder = MockEmbedder::new(4);
        let a = embedder.embed("orders table").await.unwrap();
        let b = embedder.embed("orders table").await.unwrap();
        let c = embedder.embed("customers table").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 4);
    }

    #[tokio::test]
    async fn mock_embedder_rejects_empty_text() {
        let embedder = MockEmbedder::default();
        assert!(embedder.embed("").await.is_err());
    }
}
