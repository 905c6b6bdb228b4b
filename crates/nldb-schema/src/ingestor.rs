//! `SchemaIngestor`: walks a live connection's schema, builds stable
//! per-table descriptions, embeds them into `VectorIndex`, and upserts the
//! foreign-key edges they imply into `GraphIndex`.

use std::sync::Arc;
use std::time::Instant;

use nldb_core::{ConnectionId, DatabaseKind, Driver, UserId};
use nldb_graph::GraphIndex;
use nldb_llm::EmbeddingModel;
use nldb_vector::{point_id, VectorIndex, VectorPayload, VectorPoint};
use tracing::warn;

use crate::error::{SchemaIngestorError, SchemaIngestorResult};
use crate::parse::{describe, foreign_key_edges, group_by_table};
use crate::query::enumeration_query;

/// Nothing truncates this run; the enumeration query always returns the
/// whole schema in one call.
const MAX_ROWS: usize = usize::MAX;

/// Outcome of one `ingest` call.
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    /// Number of distinct tables the driver reported.
    pub tables_analyzed: usize,
    /// Number of tables whose embedding was generated and upserted.
    pub embeddings_generated: usize,
    /// Wall-clock time the run took, in milliseconds.
    pub processing_ms: u64,
    /// Set if any table failed or the graph upsert failed; the run still
    /// completes best-effort for the remaining tables.
    pub error: Option<String>,
}

/// Walks a connection's schema and keeps `VectorIndex`/`GraphIndex` current.
pub struct SchemaIngestor {
    vector_index: Arc<VectorIndex>,
    graph_index: Arc<GraphIndex>,
    embedder: Arc<dyn EmbeddingModel>,
}

impl SchemaIngestor {
    /// Build a `SchemaIngestor` over the given collaborators.
    #[must_use]
    pub fn new(
        vector_index: Arc<VectorIndex>,
        graph_index: Arc<GraphIndex>,
        embedder: Arc<dyn EmbeddingModel>,
    ) -> Self {
        Self {
            vector_index,
            graph_index,
            embedder,
        }
    }

    /// Enumerate `connection_id`'s schema through `driver`, embed each
    /// table's description, and replace its graph edges.
    ///
    /// Idempotent: re-running over an unchanged schema produces the same
    /// `VectorIndex` points (stable ids, stable descriptions) and the same
    /// `GraphIndex` edge set (a full atomic replace, not an append).
    pub async fn ingest(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
        kind: DatabaseKind,
        driver: &Arc<dyn Driver>,
    ) -> SchemaIngestorResult<IngestSummary> {
        let start = Instant::now();

        let rows = driver
            .execute(enumeration_query(kind), MAX_ROWS)
            .await
            .map_err(|err| SchemaIngestorError::DriverUnreachable(err.0))?;
        let tables = group_by_table(&rows);

        let mut embeddings_generated = 0usize;
        let mut edges = Vec::new();
        let mut last_error = None;

        for table in &tables {
            let description = describe(table);
            match self.embedder.embed(&description).await {
                Ok(vector) => {
                    let point = VectorPoint {
                        id: point_id(connection_id, &table.table_name),
                        vector,
                        payload: VectorPayload {
                            user_id,
                            connection_id,
                            table_name: table.table_name.clone(),
                            description,
                        },
                    };
                    if let Err(err) = self.vector_index.upsert(point).await {
                        warn!(table = %table.table_name, %err, "failed to upsert table embedding, skipping");
                        last_error = Some(err.to_string());
                        continue;
                    }
                    embeddings_generated = embeddings_generated.saturating_add(1);
                }
                Err(err) => {
                    warn!(table = %table.table_name, %err, "failed to embed table description, skipping");
                    last_error = Some(err.to_string());
                    continue;
                }
            }
            edges.extend(foreign_key_edges(connection_id, table));
        }

        if let Err(err) = self.graph_index.store_relationships(connection_id, edges).await {
            warn!(%connection_id, %err, "failed to replace graph edges for connection");
            last_error = Some(err.to_string());
        }

        let processing_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(IngestSummary {
            tables_analyzed: tables.len(),
            embeddings_generated,
            processing_ms,
            error: last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_graph::InMemoryGraphStore;
    use nldb_test::mock_llm::MockEmbedder;
    use nldb_test::mocks::RecordingDriver;
    use nldb_vector::InMemoryVectorStore;

    fn sample_rows() -> nldb_core::QueryRows {
        use serde_json::{json, Value};
        nldb_core::QueryRows {
            columns: vec![
                "table_name".into(),
                "column_name".into(),
                "data_type".into(),
                "is_nullable".into(),
                "is_primary_key".into(),
                "is_foreign_key".into(),
                "referenced_table".into(),
                "referenced_column".into(),
            ],
            rows: vec![
                vec![json!("orders"), json!("id"), json!("integer"), json!(false), json!(true), json!(false), Value::Null, Value::Null],
                vec![json!("orders"), json!("customer_id"), json!("integer"), json!(false), json!(false), json!(true), json!("customers"), json!("id")],
                vec![json!("customers"), json!("id"), json!("integer"), json!(false), json!(true), json!(false), Value::Null, Value::Null],
            ],
        }
    }

    fn ingestor() -> (SchemaIngestor, Arc<VectorIndex>, Arc<GraphIndex>) {
        let vector_index = Arc::new(VectorIndex::new(Arc::new(InMemoryVectorStore::new())));
        let graph_index = Arc::new(GraphIndex::new(Arc::new(InMemoryGraphStore::new())));
        let embedder = Arc::new(MockEmbedder::default());
        (
            SchemaIngestor::new(vector_index.clone(), graph_index.clone(), embedder),
            vector_index,
            graph_index,
        )
    }

    fn scripted_driver() -> Arc<dyn Driver> {
        Arc::new(
            RecordingDriver::new()
                .with_response(enumeration_query(DatabaseKind::Postgres), sample_rows()),
        )
    }

    #[tokio::test]
    async fn ingest_embeds_every_table_and_stores_fk_edges() {
        let (ingestor, vector_index, graph_index) = ingestor();
        let driver = scripted_driver();
        let connection_id = ConnectionId::new();
        let user_id = UserId::new();

        let summary = ingestor
            .ingest(connection_id, user_id, DatabaseKind::Postgres, &driver)
            .await
            .unwrap();

        assert_eq!(summary.tables_analyzed, 2);
        assert_eq!(summary.embeddings_generated, 2);
        assert!(summary.error.is_none());

        let related = graph_index.related_tables(connection_id, "orders", 1).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].0, "customers");

        let hits = vector_index
            .search(&[1.0; 8], 10, nldb_vector::SearchFilter::none())
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn ingest_is_idempotent() {
        let (ingestor, vector_index, graph_index) = ingestor();
        let driver = scripted_driver();
        let connection_id = ConnectionId::new();
        let user_id = UserId::new();

        ingestor
            .ingest(connection_id, user_id, DatabaseKind::Postgres, &driver)
            .await
            .unwrap();
        let second = ingestor
            .ingest(connection_id, user_id, DatabaseKind::Postgres, &driver)
            .await
            .unwrap();

        assert_eq!(second.tables_analyzed, 2);
        let edges = graph_index.related_tables(connection_id, "orders", 1).await.unwrap();
        assert_eq!(edges.len(), 1);
        let hits = vector_index
            .search(&[1.0; 8], 10, nldb_vector::SearchFilter::none())
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }
}
