//! `VectorIndex`: semantic search over schema-unit embeddings.
//!
//! # Example
//! ```rust
//! # async fn run() {
//! use std::sync::Arc;
//! use nldb_vector::{InMemoryVectorStore, SearchFilter, VectorIndex, VectorPayload, VectorPoint};
//! use nldb_core::{ConnectionId, UserId};
//!
//! let index = VectorIndex::new(Arc::new(InMemoryVectorStore::new()));
//! let connection_id = ConnectionId::new();
//! index
//!     .upsert(VectorPoint {
//!         id: format!("{connection_id}:orders"),
//!         vector: vec![1.0, 0.0],
//!         payload: VectorPayload {
//!             user_id: UserId::new(),
//!             connection_id,
//!             table_name: "orders".to_string(),
//!             description: "Table: orders.".to_string(),
//!         },
//!     })
//!     .await
//!     .unwrap();
//!
//! let hits = index.search(&[1.0, 0.0], 10, SearchFilter::none()).await.unwrap();
//! assert_eq!(hits.len(), 1);
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod index;
pub mod prelude;
mod store;

pub use error::{VectorError, VectorResult};
pub use index::{VectorIndex, DEFAULT_TOP_K};
pub use store::{cosine_similarity, point_id, InMemoryVectorStore, SearchFilter, VectorPayload, VectorPoint, VectorStore};
