//! `Classifier`: query-intent detection and general-chat replies, both
//! backed by the same language-model collaborator.
//!
//! # Example
//! ```rust
//! # async fn run() {
//! use std::sync::Arc;
//! use nldb_classifier::Classifier;
//! # struct EchoProvider;
//! # #[async_trait::async_trait]
//! # impl nldb_llm::LlmProvider for EchoProvider {
//! #     fn name(&self) -> &str { "echo" }
//! #     fn model(&self) -> &str { "echo-1" }
//! #     async fn complete(&self, _m: &[nldb_llm::Message], _s: &str) -> nldb_llm::LlmResult<nldb_llm::LlmResponse> { unimplemented!() }
//! #     fn max_context_length(&self) -> usize { 8192 }
//! # }
//! let classifier = Classifier::new(Arc::new(EchoProvider));
//! # let _ = classifier;
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod classifier;
mod error;
pub mod prelude;

pub use classifier::{Classifier, DEFAULT_CALL_TIMEOUT};
pub use error::{ClassifierError, ClassifierResult};
