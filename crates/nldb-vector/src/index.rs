//! `VectorIndex`: the component `SchemaIngestor` upserts embeddings into and
//! `Orchestrator` queries for context, backed by a [`VectorStore`].

use std::sync::Arc;

use async_trait::async_trait;
use nldb_connections::ConnectionDataPurger;
use nldb_core::ConnectionId;
use tracing::warn;

use crate::error::VectorResult;
use crate::store::{SearchFilter, VectorPayload, VectorPoint, VectorStore};

/// Default top-K used by `Orchestrator` when none is specified.
pub const DEFAULT_TOP_K: usize = 10;

/// Semantic search over schema-unit embeddings.
pub struct VectorIndex {
    store: Arc<dyn VectorStore>,
}

impl VectorIndex {
    /// Build an index over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Insert or replace a single embedding point.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::VectorError`] if the store is unavailable.
    pub async fn upsert(&self, point: VectorPoint) -> VectorResult<()> {
        self.store.upsert(point).await
    }

    /// Top-K semantically similar schema units, filtered per `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::VectorError`] if the store is unavailable.
    pub async fn search(
        &self,
        query_vector: &[f32],
        k: usize,
        filter: SearchFilter,
    ) -> VectorResult<Vec<(VectorPayload, f32)>> {
        self.store.search(query_vector, k, &filter).await
    }

    /// Remove every point for `connection_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::VectorError`] if the store is unavailable.
    pub async fn delete_by_connection(&self, connection_id: ConnectionId) -> VectorResult<()> {
        self.store.delete_by_connection(connection_id).await
    }
}

#[async_trait]
impl ConnectionDataPurger for VectorIndex {
    async fn purge(&self, connection_id: ConnectionId) {
        if let Err(err) = self.delete_by_connection(connection_id).await {
            warn!(%err, %connection_id, "failed to purge vector index for deleted connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryVectorStore;
    use nldb_core::UserId;

    #[tokio::test]
    async fn purge_delegates_to_delete_by_connection() {
        let store = Arc::new(InMemoryVectorStore::new());
        let index = VectorIndex::new(store);
        let connection_id = ConnectionId::new();
        index
            .upsert(VectorPoint {
                id: "orders".into(),
                vector: vec![1.0, 0.0],
                payload: VectorPayload {
                    user_id: UserId::new(),
                    connection_id,
                    table_name: "orders".into(),
                    description: "Table: orders.".into(),
                },
            })
            .await
            .unwrap();

        index.purge(connection_id).await;

        let hits = index
            .search(&[1.0, 0.0], 10, SearchFilter::none())
            .await
            .unwrap();
        assert!(hits.is_empty());
    }
}
