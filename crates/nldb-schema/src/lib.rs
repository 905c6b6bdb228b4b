//! `SchemaIngestor`: schema enumeration, stable description generation, and
//! keeping `VectorIndex`/`GraphIndex` current for a connection.
//!
//! # Example
//! ```rust
//! # async fn run() {
//! use std::sync::Arc;
//! use nldb_core::{ConnectionId, DatabaseKind, UserId};
//! use nldb_graph::{GraphIndex, InMemoryGraphStore};
//! use nldb_schema::SchemaIngestor;
//! use nldb_vector::{InMemoryVectorStore, VectorIndex};
//!
//! # struct NoopEmbedder;
//! # #[async_trait::async_trait]
//! # impl nldb_llm::EmbeddingModel for NoopEmbedder {
//! #     async fn embed(&self, _text: &str) -> nldb_llm::LlmResult<Vec<f32>> { Ok(vec![0.0]) }
//! #     fn dimensions(&self) -> usize { 1 }
//! # }
//! let vector_index = Arc::new(VectorIndex::new(Arc::new(InMemoryVectorStore::new())));
//! let graph_index = Arc::new(GraphIndex::new(Arc::new(InMemoryGraphStore::new())));
//! let ingestor = SchemaIngestor::new(vector_index, graph_index, Arc::new(NoopEmbedder));
//! # let _ = ingestor;
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod ingestor;
mod parse;
pub mod prelude;
mod query;

pub use error::{SchemaIngestorError, SchemaIngestorResult};
pub use ingestor::{IngestSummary, SchemaIngestor};
pub use parse::{describe, foreign_key_edges, group_by_table, ColumnInfo, TableSchema};
pub use query::enumeration_query;
