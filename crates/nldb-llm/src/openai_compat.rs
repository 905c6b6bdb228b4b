//! OpenAI-compatible LLM provider implementation.
//!
//! Works with:
//! - LM Studio (localhost:1234)
//! - `OpenAI` API
//! - vLLM
//! - Ollama (with `OpenAI` compatibility)
//! - Any `OpenAI`-compatible endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{LlmError, LlmResult};
use crate::provider::LlmProvider;
use crate::types::{LlmResponse, Message, MessageContent, MessageRole, StopReason, Usage};

const DEFAULT_LM_STUDIO_URL: &str = "http://localhost:1234/v1/chat/completions";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible LLM provider.
///
/// Works with LM Studio, `OpenAI`, and other compatible APIs.
pub struct OpenAiCompatProvider {
    client: Client,
    model: String,
    max_tokens: usize,
    temperature: f64,
    base_url: String,
    api_key: Option<String>,
    max_context: usize,
}

impl OpenAiCompatProvider {
    /// Create a new provider for LM Studio (localhost:1234).
    #[must_use]
    pub fn lm_studio() -> Self {
        Self::lm_studio_with_model("local-model")
    }

    /// Create a new provider for LM Studio with a specific model name.
    #[must_use]
    pub fn lm_studio_with_model(model: &str) -> Self {
        Self {
            client: Client::new(),
            model: model.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            base_url: DEFAULT_LM_STUDIO_URL.to_string(),
            api_key: None,      // LM Studio doesn't require auth by default
            max_context: 32768, // Reasonable default for local models
        }
    }

    /// Create a new provider for `OpenAI`.
    #[must_use]
    pub fn openai(api_key: &str, model: &str) -> Self {
        let max_context = match model {
            m if m.contains("gpt-4o") => 128_000,
            m if m.contains("gpt-4-turbo") => 128_000,
            m if m.contains("gpt-4-32k") => 32_768,
            m if m.contains("gpt-4") => 8_192,
            m if m.contains("gpt-3.5-turbo-16k") => 16_385,
            m if m.contains("gpt-3.5-turbo") => 16_385,
            _ => 8_192,
        };

        Self {
            client: Client::new(),
            model: model.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: Some(api_key.to_string()),
            max_context,
        }
    }

    /// Create a custom provider with full configuration.
    #[must_use]
    pub fn custom(base_url: &str, api_key: Option<&str>, model: &str) -> Self {
        Self {
            client: Client::new(),
            model: model.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            base_url: base_url.to_string(),
            api_key: api_key.map(ToString::to_string),
            max_context: 32768,
        }
    }

    /// Set max tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set maximum context length.
    #[must_use]
    pub fn with_max_context(mut self, max_context: usize) -> Self {
        self.max_context = max_context;
        self
    }

    /// Build the request body.
    fn build_request(&self, messages: &[Message], system: &str) -> Value {
        let mut openai_messages = Vec::new();

        if !system.is_empty() {
            openai_messages.push(serde_json::json!({
                "role": "system",
                "content": system
            }));
        }

        for msg in messages {
            openai_messages.push(convert_message(msg));
        }

        serde_json::json!({
            "model": self.model,
            "messages": openai_messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "stream": false
        })
    }
}

fn convert_message(msg: &Message) -> Value {
    let role = match msg.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::System => "system",
    };

    match &msg.content {
        MessageContent::Text(text) => {
            serde_json::json!({
                "role": role,
                "content": text
            })
        },
        MessageContent::MultiPart(parts) => {
            let content: Vec<Value> = parts
                .iter()
                .map(|part| match part {
                    crate::types::ContentPart::Text { text } => {
                        serde_json::json!({
                            "type": "text",
                            "text": text
                        })
                    },
                    crate::types::ContentPart::Image { data, media_type } => {
                        serde_json::json!({
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:{media_type};base64,{data}")
                            }
                        })
                    },
                })
                .collect();

            serde_json::json!({
                "role": role,
                "content": content
            })
        },
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "openai-compat"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_context_length(&self) -> usize {
        self.max_context
    }

    async fn complete(&self, messages: &[Message], system: &str) -> LlmResult<LlmResponse> {
        if self.api_key.as_ref().is_none_or(String::is_empty) && !is_local_url(&self.base_url) {
            return Err(LlmError::ApiKeyNotConfigured {
                provider: "openai-compat".to_string(),
            });
        }

        let request_body = self.build_request(messages, system);

        debug!(
            model = %self.model,
            base_url = %self.base_url,
            "Making OpenAI-compatible completion request"
        );

        let mut request = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/json");

        if let Some(ref api_key) = self.api_key {
            let mut auth_value = reqwest::header::HeaderValue::try_from(format!(
                "Bearer {api_key}"
            ))
            .map_err(|e| LlmError::ApiRequestFailed(format!("Invalid API key characters: {e}")))?;
            auth_value.set_sensitive(true);
            request = request.header("Authorization", auth_value);
        }

        let response = request
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let status_code = status.as_u16();
            return Err(LlmError::InvalidResponse(format!(
                "HTTP {status_code}: {body}"
            )));
        }

        let response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        let message = Message {
            role: MessageRole::Assistant,
            content: MessageContent::Text(choice.message.content.clone().unwrap_or_default()),
        };

        let stop_reason = match choice.finish_reason.as_deref() {
            Some("length") => StopReason::MaxTokens,
            Some("content_filter") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        Ok(LlmResponse {
            message,
            stop_reason,
            usage: Usage {
                input_tokens: response.usage.prompt_tokens,
                output_tokens: response.usage.completion_tokens,
            },
        })
    }
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("max_context", &self.max_context)
            .finish_non_exhaustive()
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: OpenAiUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

/// Check whether a URL points to a local endpoint (localhost, 127.0.0.1, etc.)
/// where an API key is typically not required.
fn is_local_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("localhost") || lower.contains("127.0.0.1") || lower.contains("[::1]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lm_studio_creation() {
        let provider = OpenAiCompatProvider::lm_studio();
        assert_eq!(provider.model(), "local-model");
        assert!(provider.api_key.is_none());
        assert!(provider.base_url.contains("localhost:1234"));
    }

    #[test]
    fn test_openai_creation() {
        let provider = OpenAiCompatProvider::openai("sk-test", "gpt-4");
        assert_eq!(provider.model(), "gpt-4");
        assert!(provider.api_key.is_some());
        assert!(provider.base_url.contains("api.openai.com"));
    }

    #[test]
    fn test_custom_provider() {
        let provider = OpenAiCompatProvider::custom(
            "http://my-server:8080/v1/chat/completions",
            Some("my-key"),
            "my-model",
        );
        assert_eq!(provider.model(), "my-model");
        assert_eq!(
            provider.base_url,
            "http://my-server:8080/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_invalid_api_key_characters() {
        let provider = OpenAiCompatProvider::openai("invalid\nkey", "gpt-4");
        let Err(err_complete) = provider.complete(&[], "").await else {
            panic!("Expected error");
        };
        assert!(
            matches!(err_complete, LlmError::ApiRequestFailed(ref msg) if msg.contains("Invalid API key characters"))
        );
    }

    #[test]
    fn test_message_conversion() {
        let msg = Message::user("Hello");
        let converted = convert_message(&msg);
        assert_eq!(converted["role"], "user");
        assert_eq!(converted["content"], "Hello");
    }

    #[test]
    fn test_build_request() {
        let provider = OpenAiCompatProvider::lm_studio();
        let messages = vec![Message::user("Hi")];
        let request = provider.build_request(&messages, "Be helpful");

        assert_eq!(request["model"], "local-model");
        assert_eq!(request["stream"], false);
        assert!(request["messages"].as_array().unwrap().len() >= 2); // system + user
    }
}
