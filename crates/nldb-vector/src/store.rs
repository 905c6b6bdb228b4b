//! The `VectorStore` outbound collaborator: whatever actual vector database
//! a deployment points at. Only an in-memory adapter ships here; a real
//! embedded or remote vector database client is a deployment-time choice
//! outside this crate's scope.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use nldb_core::{ConnectionId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::{VectorError, VectorResult};

/// The payload stored alongside a schema unit's embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPayload {
    /// Owning user, for per-user filtering.
    pub user_id: UserId,
    /// Connection this schema unit belongs to.
    pub connection_id: ConnectionId,
    /// Fully qualified table/collection name.
    pub table_name: String,
    /// The stable textual description this embedding was computed from.
    pub description: String,
}

/// One stored point: an embedding plus its payload, keyed by a stable id
/// (`(connectionId, tableName)` in practice).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    /// Stable key this point was upserted under.
    pub id: String,
    /// The embedding vector. Dimension is fixed per deployment.
    pub vector: Vec<f32>,
    /// The payload returned alongside search hits.
    pub payload: VectorPayload,
}

/// Filter applied to `search`. Both fields are exact-match and optional;
/// omitted fields place no constraint.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Restrict results to this user's own points.
    pub user_id: Option<UserId>,
    /// Restrict results to this connection's points.
    pub connection_id: Option<ConnectionId>,
}

impl SearchFilter {
    /// A filter with no constraints.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    fn matches(&self, payload: &VectorPayload) -> bool {
        self.user_id.is_none_or(|uid| uid == payload.user_id)
            && self
                .connection_id
                .is_none_or(|cid| cid == payload.connection_id)
    }
}

/// Where `VectorIndex` stores embeddings and runs similarity search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace the point keyed by `point.id`.
    async fn upsert(&self, point: VectorPoint) -> VectorResult<()>;

    /// Return the `k` points most similar to `query`, most similar first,
    /// restricted to points matching `filter`. Ties are broken by
    /// insertion order.
    async fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: &SearchFilter,
    ) -> VectorResult<Vec<(VectorPayload, f32)>>;

    /// Remove every point belonging to `connection_id`.
    async fn delete_by_connection(&self, connection_id: ConnectionId) -> VectorResult<()>;
}

/// Cosine similarity between two equal-length vectors. Higher is more
/// similar; `0.0` if either vector has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// In-memory [`VectorStore`], keyed by `connection_id` so deletion is O(1)
/// per connection. Points within a connection keep insertion order for
/// stable tie-breaking.
pub struct InMemoryVectorStore {
    points: DashMap<ConnectionId, Vec<VectorPoint>>,
}

impl InMemoryVectorStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: DashMap::new(),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, point: VectorPoint) -> VectorResult<()> {
        let mut bucket = self.points.entry(point.payload.connection_id).or_default();
        if let Some(existing) = bucket.iter_mut().find(|p| p.id == point.id) {
            *existing = point;
        } else {
            bucket.push(point);
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: &SearchFilter,
    ) -> VectorResult<Vec<(VectorPayload, f32)>> {
        let mut scored: Vec<(usize, VectorPayload, f32)> = Vec::new();
        let mut order = 0usize;

        let connections: Vec<ConnectionId> = match filter.connection_id {
            Some(cid) => vec![cid],
            None => self.points.iter().map(|e| *e.key()).collect(),
        };

        for connection_id in connections {
            let Some(bucket) = self.points.get(&connection_id) else {
                continue;
            };
            for point in bucket.iter() {
                if !filter.matches(&point.payload) {
                    order += 1;
                    continue;
                }
                let score = cosine_similarity(query, &point.vector);
                scored.push((order, point.payload.clone(), score));
                order += 1;
            }
        }

        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);
        Ok(scored.into_iter().map(|(_, payload, score)| (payload, score)).collect())
    }

    async fn delete_by_connection(&self, connection_id: ConnectionId) -> VectorResult<()> {
        self.points.remove(&connection_id);
        Ok(())
    }
}

/// Build a point id stable across re-ingestion for the same table.
#[must_use]
pub fn point_id(connection_id: ConnectionId, table_name: &str) -> String {
    format!("{connection_id}:{table_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(connection_id: ConnectionId, user_id: UserId, table: &str, vector: Vec<f32>) -> VectorPoint {
        VectorPoint {
            id: point_id(connection_id, table),
            vector,
            payload: VectorPayload {
                user_id,
                connection_id,
                table_name: table.to_string(),
                description: format!("Table: {table}."),
            },
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_id() {
        let store = InMemoryVectorStore::new();
        let connection_id = ConnectionId::new();
        let user_id = UserId::new();
        store
            .upsert(point(connection_id, user_id, "orders", vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .upsert(point(connection_id, user_id, "orders", vec![0.0, 1.0]))
            .await
            .unwrap();

        let hits = store
            .search(&[0.0, 1.0], 10, &SearchFilter::none())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].1 - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn search_ranks_by_cosine_similarity() {
        let store = InMemoryVectorStore::new();
        let connection_id = ConnectionId::new();
        let user_id = UserId::new();
        store
            .upsert(point(connection_id, user_id, "orders", vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .upsert(point(connection_id, user_id, "customers", vec![0.0, 1.0]))
            .await
            .unwrap();

        let hits = store
            .search(&[1.0, 0.0], 10, &SearchFilter::none())
            .await
            .unwrap();
        assert_eq!(hits[0].0.table_name, "orders");
    }

    #[tokio::test]
    async fn filter_excludes_other_users() {
        let store = InMemoryVectorStore::new();
        let connection_id = ConnectionId::new();
        let owner = UserId::new();
        let other = UserId::new();
        store
            .upsert(point(connection_id, owner, "orders", vec![1.0, 0.0]))
            .await
            .unwrap();

        let filter = SearchFilter {
            user_id: Some(other),
            connection_id: None,
        };
        let hits = store.search(&[1.0, 0.0], 10, &filter).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn delete_by_connection_removes_all_its_points() {
        let store = InMemoryVectorStore::new();
        let connection_id = ConnectionId::new();
        let user_id = UserId::new();
        store
            .upsert(point(connection_id, user_id, "orders", vec![1.0, 0.0]))
            .await
            .unwrap();

        store.delete_by_connection(connection_id).await.unwrap();
        let hits = store
            .search(&[1.0, 0.0], 10, &SearchFilter::none())
            .await
            .unwrap();
        assert!(hits.is_empty());
    }
}
