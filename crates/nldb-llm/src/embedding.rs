//! Embedding model abstraction.
//!
//! Schema ingestion and vector search both need a way to turn text into a
//! fixed-width vector; this module defines the trait they depend on plus an
//! `OpenAI`-compatible HTTP implementation (the same family of endpoints
//! [`crate::openai_compat`] talks to for chat completion).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{LlmError, LlmResult};

const DEFAULT_OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Produces vector embeddings for text.
///
/// Implementors are expected to be cheap to clone (typically an
/// `Arc<reqwest::Client>` internally) and safe to share across tasks.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embed a single piece of text.
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>>;

    /// Embed a batch of texts in one request where the backend supports it.
    ///
    /// The default implementation calls [`EmbeddingModel::embed`] once per
    /// input; implementors should override this when the backend accepts a
    /// batch of inputs in a single call.
    async fn embed_batch(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Dimensionality of the vectors this model produces.
    fn dimensions(&self) -> usize;
}

/// `OpenAI`-compatible embeddings client.
///
/// Works with the `OpenAI` embeddings endpoint and any server exposing the
/// same `POST /v1/embeddings` contract (LM Studio, vLLM, and similar).
pub struct OpenAiCompatEmbedder {
    client: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
    dimensions: usize,
}

impl OpenAiCompatEmbedder {
    /// Create an embedder against the `OpenAI` API.
    #[must_use]
    pub fn openai(api_key: &str, model: &str) -> Self {
        let dimensions = match model {
            "text-embedding-3-large" => 3072,
            _ => 1536, // text-embedding-3-small and most local models
        };
        Self {
            client: Client::new(),
            model: model.to_string(),
            base_url: DEFAULT_OPENAI_EMBEDDINGS_URL.to_string(),
            api_key: Some(api_key.to_string()),
            dimensions,
        }
    }

    /// Create an embedder against a custom `OpenAI`-compatible endpoint.
    #[must_use]
    pub fn custom(base_url: &str, api_key: Option<&str>, model: &str, dimensions: usize) -> Self {
        Self {
            client: Client::new(),
            model: model.to_string(),
            base_url: base_url.to_string(),
            api_key: api_key.map(ToString::to_string),
            dimensions,
        }
    }

    fn build_request(&self, input: &[String]) -> serde_json::Value {
        json!({
            "model": self.model,
            "input": input,
        })
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingModel for OpenAiCompatEmbedder {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        let mut vectors = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
        vectors
            .pop()
            .ok_or_else(|| LlmError::InvalidResponse("embeddings response was empty".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
        debug!(count = texts.len(), model = %self.model, "requesting embeddings");

        let mut request = self.client.post(&self.base_url).json(&self.build_request(texts));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiRequestFailed(format!(
                "embeddings request failed with {status}: {body}"
            )));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_dimensions_match_known_models() {
        let small = OpenAiCompatEmbedder::openai("key", "text-embedding-3-small");
        assert_eq!(small.dimensions(), 1536);

        let large = OpenAiCompatEmbedder::openai("key", "text-embedding-3-large");
        assert_eq!(large.dimensions(), 3072);
    }

    #[test]
    fn custom_dimensions_are_respected() {
        let custom = OpenAiCompatEmbedder::custom("http://localhost:8080/embed", None, "local", 768);
        assert_eq!(custom.dimensions(), 768);
    }
}
