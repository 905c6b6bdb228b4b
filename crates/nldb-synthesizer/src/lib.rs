//! `QuerySynthesizer`: natural language to dialect-specific query text.
//! Never executes the query it produces.
//!
//! # Example
//! ```rust
//! # async fn run() {
//! use std::sync::Arc;
//! use nldb_synthesizer::QuerySynthesizer;
//! # struct EchoProvider;
//! # #[async_trait::async_trait]
//! # impl nldb_llm::LlmProvider for EchoProvider {
//! #     fn name(&self) -> &str { "echo" }
//! #     fn model(&self) -> &str { "echo-1" }
//! #     async fn complete(&self, _m: &[nldb_llm::Message], _s: &str) -> nldb_llm::LlmResult<nldb_llm::LlmResponse> { unimplemented!() }
//! #     fn max_context_length(&self) -> usize { 8192 }
//! # }
//! let synthesizer = QuerySynthesizer::new(Arc::new(EchoProvider));
//! # let _ = synthesizer;
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
pub mod prelude;
mod prompt;
mod synthesizer;

pub use error::{SynthesizerError, SynthesizerResult};
pub use prompt::ContextTable;
pub use synthesizer::{QuerySynthesizer, SynthesisOutput, DEFAULT_CALL_TIMEOUT};
