//! LLM provider abstraction for the natural-language database exploration
//! core.
//!
//! Two traits anchor this crate:
//!
//! - [`LlmProvider`] drives query classification and query synthesis via
//!   plain request/response completion.
//! - [`EmbeddingModel`] turns schema text and user questions into vectors for
//!   the vector index's semantic search.
//!
//! Both are implemented against `Claude` and any `OpenAI`-compatible
//! endpoint (`OpenAI` itself, LM Studio, vLLM, Ollama).

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod claude;
mod embedding;
mod error;
mod openai_compat;
pub mod prelude;
mod provider;
mod types;

pub use claude::ClaudeProvider;
pub use embedding::{EmbeddingModel, OpenAiCompatEmbedder};
pub use error::{LlmError, LlmResult};
pub use openai_compat::OpenAiCompatProvider;
pub use provider::{LlmProvider, ProviderConfig};
pub use types::{ContentPart, LlmResponse, Message, MessageContent, MessageRole, StopReason, Usage};
