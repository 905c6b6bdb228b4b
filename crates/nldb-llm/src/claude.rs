//! Claude (Anthropic) LLM provider implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{LlmError, LlmResult};
use crate::provider::{LlmProvider, ProviderConfig};
use crate::types::{LlmResponse, Message, MessageContent, MessageRole, StopReason, Usage};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude LLM provider.
pub struct ClaudeProvider {
    client: Client,
    config: ProviderConfig,
}

impl ClaudeProvider {
    /// Create a new Claude provider.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Build the API request body.
    fn build_request(&self, messages: &[Message], system: &str) -> Value {
        let api_messages: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(Self::convert_message)
            .collect();

        let mut request = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": api_messages,
            "stream": false,
        });

        if !system.is_empty() {
            request["system"] = Value::String(system.to_string());
        }

        request
    }

    /// Convert our Message to Anthropic format.
    fn convert_message(message: &Message) -> Value {
        match &message.content {
            MessageContent::Text(text) => {
                serde_json::json!({
                    "role": match message.role {
                        MessageRole::Assistant => "assistant",
                        MessageRole::User | MessageRole::System => "user",
                    },
                    "content": text,
                })
            },
            MessageContent::MultiPart(parts) => {
                let content: Vec<Value> = parts
                    .iter()
                    .map(|p| match p {
                        crate::types::ContentPart::Text { text } => {
                            serde_json::json!({"type": "text", "text": text})
                        },
                        crate::types::ContentPart::Image { data, media_type } => {
                            serde_json::json!({
                                "type": "image",
                                "source": {
                                    "type": "base64",
                                    "media_type": media_type,
                                    "data": data,
                                }
                            })
                        },
                    })
                    .collect();

                serde_json::json!({
                    "role": match message.role {
                        MessageRole::Assistant => "assistant",
                        MessageRole::User | MessageRole::System => "user",
                    },
                    "content": content,
                })
            },
        }
    }

    /// Parse a response into our types.
    fn parse_response(response: &ApiResponse) -> LlmResponse {
        let mut text_content = String::new();
        for block in &response.content {
            let ContentBlock::Text { text } = block;
            text_content.push_str(text);
        }

        let stop_reason = match response.stop_reason.as_deref() {
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        LlmResponse {
            message: Message::assistant(text_content),
            stop_reason,
            usage: Usage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "Anthropic Claude"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, messages: &[Message], system: &str) -> LlmResult<LlmResponse> {
        if self.config.api_key.is_empty() {
            return Err(LlmError::ApiKeyNotConfigured {
                provider: "claude".to_string(),
            });
        }

        let request_body = self.build_request(messages, system);
        let url = self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL);

        debug!(model = self.config.model, "Sending Claude request");

        let mut api_key_header = reqwest::header::HeaderValue::try_from(&self.config.api_key)
            .map_err(|e| LlmError::ConfigError(format!("Invalid API key characters: {e}")))?;
        api_key_header.set_sensitive(true);

        let response = self
            .client
            .post(url)
            .header("x-api-key", api_key_header)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Claude API error");

            if status.as_u16() == 429 {
                return Err(LlmError::RateLimitExceeded {
                    retry_after_secs: 60,
                });
            }

            return Err(LlmError::ApiRequestFailed(format!(
                "Status {status}: {body}"
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(Self::parse_response(&api_response))
    }

    fn max_context_length(&self) -> usize {
        // Claude 3.5 Sonnet has 200k context
        200_000
    }
}

// API response types

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: usize,
    output_tokens: usize,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_api_key_characters() {
        let config = ProviderConfig::new("invalid\nkey", "claude-3-sonnet");
        let provider = ClaudeProvider::new(config);
        let Err(err_complete) = provider.complete(&[], "").await else {
            panic!("Expected error");
        };
        assert!(
            matches!(err_complete, LlmError::ConfigError(ref msg) if msg.contains("Invalid API key characters"))
        );
    }

    #[test]
    fn test_build_request() {
        let config = ProviderConfig::new("test-key", "claude-3-sonnet");
        let provider = ClaudeProvider::new(config);

        let messages = vec![Message::user("Hello")];
        let request = provider.build_request(&messages, "You are helpful");

        assert_eq!(request["model"], "claude-3-sonnet");
        assert_eq!(request["system"], "You are helpful");
        assert!(!request["stream"].as_bool().unwrap());
    }

    #[test]
    fn test_convert_message() {
        let msg = Message::user("Hello");
        let converted = ClaudeProvider::convert_message(&msg);

        assert_eq!(converted["role"], "user");
        assert_eq!(converted["content"], "Hello");
    }
}
