//! `GraphIndex`: directed foreign-key/inferred edge storage and bounded
//! breadth-first traversal between tables.
//!
//! # Example
//! ```rust
//! # async fn run() {
//! use std::sync::Arc;
//! use nldb_core::{ConnectionId, TableRelationship};
//! use nldb_graph::{GraphIndex, InMemoryGraphStore};
//!
//! let index = GraphIndex::new(Arc::new(InMemoryGraphStore::new()));
//! let connection_id = ConnectionId::new();
//! index
//!     .store_relationships(
//!         connection_id,
//!         vec![TableRelationship {
//!             connection_id,
//!             from_table: "orders".to_string(),
//!             to_table: "customers".to_string(),
//!             from_column: "customer_id".to_string(),
//!             to_column: "id".to_string(),
//!             relationship_kind: "foreign_key".to_string(),
//!         }],
//!     )
//!     .await
//!     .unwrap();
//!
//! let related = index.related_tables(connection_id, "orders", 1).await.unwrap();
//! assert_eq!(related.len(), 1);
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

pub use error::{GraphError, GraphResult};
pub use index::GraphIndex;
pub use store::{GraphStore, InMemoryGraphStore};
