//! The `GraphStore` outbound collaborator: whatever actual graph database a
//! deployment points at. Only an in-memory adapter ships here; a real
//! embedded or remote graph database client is a deployment-time choice
//! outside this crate's scope.

use async_trait::async_trait;
use dashmap::DashMap;
use nldb_core::{ConnectionId, TableRelationship};

use crate::error::GraphResult;

/// Where `GraphIndex` stores a connection's foreign-key/inferred edges.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Atomically replace `connection_id`'s entire edge set.
    async fn upsert_edges(
        &self,
        connection_id: ConnectionId,
        edges: Vec<TableRelationship>,
    ) -> GraphResult<()>;

    /// All edges currently stored for `connection_id`, in insertion order.
    async fn edges(&self, connection_id: ConnectionId) -> GraphResult<Vec<TableRelationship>>;

    /// Remove every edge belonging to `connection_id`.
    async fn delete_by_connection(&self, connection_id: ConnectionId) -> GraphResult<()>;
}

/// In-memory [`GraphStore`], keyed by `connection_id`.
pub struct InMemoryGraphStore {
    edges: DashMap<ConnectionId, Vec<TableRelationship>>,
}

impl InMemoryGraphStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            edges: DashMap::new(),
        }
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn upsert_edges(
        &self,
        connection_id: ConnectionId,
        edges: Vec<TableRelationship>,
    ) -> GraphResult<()> {
        self.edges.insert(connection_id, edges);
        Ok(())
    }

    async fn edges(&self, connection_id: ConnectionId) -> GraphResult<Vec<TableRelationship>> {
        Ok(self
            .edges
            .get(&connection_id)
            .map(|e| e.clone())
            .unwrap_or_default())
    }

    async fn delete_by_connection(&self, connection_id: ConnectionId) -> GraphResult<()> {
        self.edges.remove(&connection_id);
        Ok(())
    }
}
