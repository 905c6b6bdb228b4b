//! `GraphIndex`: the component `SchemaIngestor` emits foreign-key edges into
//! and `Orchestrator`/tooling queries for relationship context, backed by a
//! [`GraphStore`].

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use nldb_connections::ConnectionDataPurger;
use nldb_core::{ConnectionId, TableRelationship};
use tracing::warn;

use crate::error::GraphResult;
use crate::store::GraphStore;

/// Directed foreign-key/inferred edge traversal between tables.
pub struct GraphIndex {
    store: Arc<dyn GraphStore>,
}

impl GraphIndex {
    /// Build an index over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Atomically replace `connection_id`'s entire edge set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GraphError`] if the store is unavailable.
    pub async fn store_relationships(
        &self,
        connection_id: ConnectionId,
        edges: Vec<TableRelationship>,
    ) -> GraphResult<()> {
        self.store.upsert_edges(connection_id, edges).await
    }

    /// Every acyclic path from `source` to `target`, depth-bounded
    /// (inclusive) by `max_depth`. If `source == target`, the single
    /// zero-length path is returned regardless of `max_depth`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GraphError`] if the store is unavailable.
    pub async fn find_paths(
        &self,
        connection_id: ConnectionId,
        source: &str,
        target: &str,
        max_depth: usize,
    ) -> GraphResult<Vec<Vec<TableRelationship>>> {
        if source == target {
            return Ok(vec![Vec::new()]);
        }
        if max_depth == 0 {
            return Ok(Vec::new());
        }

        let edges = self.store.edges(connection_id).await?;
        let adjacency = build_adjacency(&edges);

        let mut results = Vec::new();
        let mut queue: VecDeque<(String, Vec<TableRelationship>, HashSet<String>)> = VecDeque::new();
        let mut visited = HashSet::new();
        visited.insert(source.to_string());
        queue.push_back((source.to_string(), Vec::new(), visited));

        while let Some((node, path, visited)) = queue.pop_front() {
            if path.len() >= max_depth {
                continue;
            }
            let Some(out_edges) = adjacency.get(&node) else {
                continue;
            };
            for edge in out_edges {
                if visited.contains(&edge.to_table) {
                    continue;
                }
                let mut next_path = path.clone();
                next_path.push(edge.clone());
                if edge.to_table == target {
                    results.push(next_path.clone());
                }
                let mut next_visited = visited.clone();
                next_visited.insert(edge.to_table.clone());
                queue.push_back((edge.to_table.clone(), next_path, next_visited));
            }
        }

        Ok(results)
    }

    /// Tables reachable from `table` within `max_depth` hops, paired with
    /// their shortest distance, in breadth-first (first-seen) order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GraphError`] if the store is unavailable.
    pub async fn related_tables(
        &self,
        connection_id: ConnectionId,
        table: &str,
        max_depth: usize,
    ) -> GraphResult<Vec<(String, usize)>> {
        let edges = self.store.edges(connection_id).await?;
        let adjacency = build_adjacency(&edges);

        let mut order: Vec<(String, usize)> = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(table.to_string());
        let mut queue = VecDeque::new();
        queue.push_back((table.to_string(), 0usize));

        while let Some((node, dist)) = queue.pop_front() {
            if dist >= max_depth {
                continue;
            }
            let Some(out_edges) = adjacency.get(&node) else {
                continue;
            };
            for edge in out_edges {
                if seen.contains(&edge.to_table) {
                    continue;
                }
                seen.insert(edge.to_table.clone());
                let next_dist = dist + 1;
                order.push((edge.to_table.clone(), next_dist));
                queue.push_back((edge.to_table.clone(), next_dist));
            }
        }

        Ok(order)
    }

    /// For each of `tables`: its direct outgoing dependencies, and the
    /// in-degree of every input table across the connection's full edge set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GraphError`] if the store is unavailable.
    pub async fn analyze_dependencies(
        &self,
        connection_id: ConnectionId,
        tables: &[String],
    ) -> GraphResult<(HashMap<String, Vec<String>>, HashMap<String, usize>)> {
        let edges = self.store.edges(connection_id).await?;
        let adjacency = build_adjacency(&edges);

        let mut dependencies = HashMap::new();
        for table in tables {
            let deps = adjacency
                .get(table)
                .map(|out| out.iter().map(|e| e.to_table.clone()).collect())
                .unwrap_or_default();
            dependencies.insert(table.clone(), deps);
        }

        let mut counts: HashMap<String, usize> =
            tables.iter().map(|t| (t.clone(), 0usize)).collect();
        for edge in &edges {
            if let Some(count) = counts.get_mut(&edge.to_table) {
                *count = count.saturating_add(1);
            }
        }

        Ok((dependencies, counts))
    }

    /// Remove every edge for `connection_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GraphError`] if the store is unavailable.
    pub async fn delete_by_connection(&self, connection_id: ConnectionId) -> GraphResult<()> {
        self.store.delete_by_connection(connection_id).await
    }
}

fn build_adjacency(edges: &[TableRelationship]) -> HashMap<String, Vec<TableRelationship>> {
    let mut adjacency: HashMap<String, Vec<TableRelationship>> = HashMap::new();
    for edge in edges {
        adjacency.entry(edge.from_table.clone()).or_default().push(edge.clone());
    }
    adjacency
}

#[async_trait]
impl ConnectionDataPurger for GraphIndex {
    async fn purge(&self, connection_id: ConnectionId) {
        if let Err(err) = self.delete_by_connection(connection_id).await {
            warn!(%err, %connection_id, "failed to purge graph index for deleted connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryGraphStore;

    fn edge(from: &str, to: &str) -> TableRelationship {
        TableRelationship {
            connection_id: ConnectionId::new(),
            from_table: from.to_string(),
            to_table: to.to_string(),
            from_column: "id".to_string(),
            to_column: "id".to_string(),
            relationship_kind: "foreign_key".to_string(),
        }
    }

    async fn seeded(edges: Vec<TableRelationship>) -> (GraphIndex, ConnectionId) {
        let store = Arc::new(InMemoryGraphStore::new());
        let index = GraphIndex::new(store);
        let connection_id = ConnectionId::new();
        index.store_relationships(connection_id, edges).await.unwrap();
        (index, connection_id)
    }

    #[tokio::test]
    async fn find_paths_zero_depth_same_table_returns_empty_path() {
        let (index, connection_id) = seeded(vec![]).await;
        let paths = index
            .find_paths(connection_id, "orders", "orders", 0)
            .await
            .unwrap();
        assert_eq!(paths, vec![Vec::new()]);
    }

    #[tokio::test]
    async fn find_paths_zero_depth_different_tables_returns_empty() {
        let (index, connection_id) = seeded(vec![edge("orders", "customers")]).await;
        let paths = index
            .find_paths(connection_id, "orders", "customers", 0)
            .await
            .unwrap();
        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn find_paths_follows_multi_hop_chain() {
        let (index, connection_id) = seeded(vec![
            edge("orders", "customers"),
            edge("customers", "regions"),
        ])
        .await;
        let paths = index
            .find_paths(connection_id, "orders", "regions", 3)
            .await
            .unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 2);
    }

    #[tokio::test]
    async fn related_tables_reports_hop_distance() {
        let (index, connection_id) = seeded(vec![
            edge("orders", "customers"),
            edge("customers", "regions"),
        ])
        .await;
        let related = index.related_tables(connection_id, "orders", 2).await.unwrap();
        assert_eq!(related, vec![("customers".to_string(), 1), ("regions".to_string(), 2)]);
    }

    #[tokio::test]
    async fn analyze_dependencies_reports_outgoing_and_in_degree() {
        let (index, connection_id) = seeded(vec![
            edge("orders", "customers"),
            edge("order_items", "customers"),
        ])
        .await;
        let (deps, counts) = index
            .analyze_dependencies(connection_id, &["orders".to_string(), "customers".to_string()])
            .await
            .unwrap();
        assert_eq!(deps["orders"], vec!["customers".to_string()]);
        assert!(deps["customers"].is_empty());
        assert_eq!(counts["customers"], 2);
        assert_eq!(counts["orders"], 0);
    }

    #[tokio::test]
    async fn purge_delegates_to_delete_by_connection() {
        let (index, connection_id) = seeded(vec![edge("orders", "customers")]).await;
        index.purge(connection_id).await;
        let edges = index.store.edges(connection_id).await.unwrap();
        assert!(edges.is_empty());
    }
}
