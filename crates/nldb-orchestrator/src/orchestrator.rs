//! `Orchestrator`: the per-turn pipeline that turns one user message into a
//! reply, deciding along the way whether the message needs a database query
//! at all.

use std::sync::Arc;
use std::time::Duration;

use nldb_classifier::Classifier;
use nldb_connections::ConnectionManager;
use nldb_core::{AppError, AppResult, ConnectionId, SessionId, UserId};
use nldb_executor::{ExecutionResult, ExecutionStatus, QueryExecutor};
use nldb_graph::GraphIndex;
use nldb_llm::EmbeddingModel;
use nldb_synthesizer::{ContextTable, QuerySynthesizer};
use nldb_vector::{SearchFilter, VectorIndex, DEFAULT_TOP_K};
use tracing::warn;

use crate::context;
use crate::error::OrchestratorError;

/// How many hops `GraphIndex::related_tables` expands from each vector hit.
pub const DEFAULT_GRAPH_HOP_DEPTH: usize = 1;

/// Row cap passed to `QueryExecutor` when a turn doesn't override it.
pub const DEFAULT_MAX_ROWS: usize = 1000;

/// Deadline for a turn once it's known to need a generated query.
pub const DEFAULT_QUERY_INTENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for a turn that only needs a conversational reply.
pub const DEFAULT_GENERAL_TIMEOUT: Duration = Duration::from_secs(10);

/// The result of running one user message through the pipeline.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// `true` if the Classifier decided this turn needed a database query.
    pub query_intent: bool,
    /// The reply to show the user.
    pub assistant_message: String,
    /// The schema context the synthesizer was given, empty for general chat.
    pub context_tables: Vec<ContextTable>,
    /// The query the synthesizer produced, `None` for general chat.
    pub generated_query: Option<String>,
    /// The executor's result, `None` for general chat.
    pub execution: Option<ExecutionResult>,
}

/// Ties `Classifier`, `VectorIndex`, `GraphIndex`, `QuerySynthesizer`, and
/// `QueryExecutor` together into the turn pipeline described by the system
/// this crate implements.
pub struct Orchestrator {
    classifier: Arc<Classifier>,
    vector_index: Arc<VectorIndex>,
    graph_index: Arc<GraphIndex>,
    synthesizer: Arc<QuerySynthesizer>,
    executor: Arc<QueryExecutor>,
    connections: Arc<ConnectionManager>,
    embedder: Arc<dyn EmbeddingModel>,
    max_context_tables: usize,
    max_rows: usize,
    query_intent_timeout: Duration,
    general_timeout: Duration,
}

impl Orchestrator {
    /// Build an orchestrator over its collaborators, with default context
    /// width (`DEFAULT_TOP_K`) and row cap (`DEFAULT_MAX_ROWS`).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        classifier: Arc<Classifier>,
        vector_index: Arc<VectorIndex>,
        graph_index: Arc<GraphIndex>,
        synthesizer: Arc<QuerySynthesizer>,
        executor: Arc<QueryExecutor>,
        connections: Arc<ConnectionManager>,
        embedder: Arc<dyn EmbeddingModel>,
    ) -> Self {
        Self {
            classifier,
            vector_index,
            graph_index,
            synthesizer,
            executor,
            connections,
            embedder,
            max_context_tables: DEFAULT_TOP_K,
            max_rows: DEFAULT_MAX_ROWS,
            query_intent_timeout: DEFAULT_QUERY_INTENT_TIMEOUT,
            general_timeout: DEFAULT_GENERAL_TIMEOUT,
        }
    }

    /// Override the context-table cap.
    #[must_use]
    pub fn with_max_context_tables(mut self, max_context_tables: usize) -> Self {
        self.max_context_tables = max_context_tables;
        self
    }

    /// Override the row cap passed to `QueryExecutor`.
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Override the deadline applied once a turn classifies as query-intent.
    #[must_use]
    pub fn with_query_intent_timeout(mut self, timeout: Duration) -> Self {
        self.query_intent_timeout = timeout;
        self
    }

    /// Override the deadline applied to a general-chat turn.
    #[must_use]
    pub fn with_general_timeout(mut self, timeout: Duration) -> Self {
        self.general_timeout = timeout;
        self
    }

    /// Run one user message through the pipeline.
    ///
    /// Which deadline applies depends on the Classifier's own verdict, so the
    /// deadline can only be chosen once step 1 has returned; everything from
    /// that point on (the general reply, or context gathering through
    /// execution) runs under a single `tokio::time::timeout`. On expiry the
    /// in-flight collaborator call is dropped — every `.await` point here is
    /// a plain async fn call and so cancel-safe — and this returns
    /// [`nldb_core::AppError::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns [`nldb_core::AppError::Validation`] if the turn classifies as
    /// query-intent but no `connection_id` is bound, [`nldb_core::AppError::Timeout`]
    /// if the applicable deadline passes, or whatever error the failing
    /// collaborator (Classifier, `QuerySynthesizer`, `QueryExecutor`) produced.
    pub async fn handle_turn(
        &self,
        user_id: UserId,
        session_id: SessionId,
        connection_id: Option<ConnectionId>,
        user_text: &str,
    ) -> AppResult<TurnOutcome> {
        if !self.classifier.requires_query_generation(user_text).await {
            return self.run_with_deadline(self.general_timeout, self.run_general(user_text, user_id, session_id)).await;
        }

        let connection_id = connection_id.ok_or(OrchestratorError::NoActiveConnection)?;
        self.run_with_deadline(
            self.query_intent_timeout,
            self.run_query_intent(connection_id, user_id, session_id, user_text),
        )
        .await
    }

    async fn run_with_deadline(
        &self,
        deadline: Duration,
        future: impl std::future::Future<Output = AppResult<TurnOutcome>>,
    ) -> AppResult<TurnOutcome> {
        match tokio::time::timeout(deadline, future).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(deadline)),
        }
    }

    async fn run_general(&self, user_text: &str, user_id: UserId, session_id: SessionId) -> AppResult<TurnOutcome> {
        let assistant_message = self.classifier.respond_general(user_text, user_id, session_id).await?;
        Ok(TurnOutcome {
            query_intent: false,
            assistant_message,
            context_tables: Vec::new(),
            generated_query: None,
            execution: None,
        })
    }

    async fn run_query_intent(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
        session_id: SessionId,
        user_text: &str,
    ) -> AppResult<TurnOutcome> {
        let kind = self.connections.connection_kind(connection_id, user_id).await?;

        let context_tables = self.gather_context(connection_id, user_id, user_text).await;

        let synthesis = self
            .synthesizer
            .synthesize(user_text, kind, &context_tables, user_id, session_id)
            .await?;

        let execution = self
            .executor
            .execute(&synthesis.query, connection_id, user_id, self.max_rows)
            .await?;

        let assistant_message = format_reply(&synthesis.explanation, &execution);

        Ok(TurnOutcome {
            query_intent: true,
            assistant_message,
            context_tables,
            generated_query: Some(synthesis.query),
            execution: Some(execution),
        })
    }

    /// Gather schema context: embed `user_text`, search `VectorIndex` for
    /// the top-K relevant tables, then expand one hop out from each via
    /// `GraphIndex`, concurrently. Either branch failing outright is
    /// non-fatal; the turn proceeds with whatever context did arrive.
    async fn gather_context(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
        user_text: &str,
    ) -> Vec<ContextTable> {
        let embedding = match self.embedder.embed(user_text).await {
            Ok(vector) => vector,
            Err(err) => {
                warn!(%err, "failed to embed user text, proceeding with no schema context");
                return Vec::new();
            }
        };

        let filter = SearchFilter {
            user_id: Some(user_id),
            connection_id: Some(connection_id),
        };
        let vector_hits = match self
            .vector_index
            .search(&embedding, self.max_context_tables, filter)
            .await
        {
            Ok(hits) => hits,
            Err(err) => {
                warn!(%err, "vector search failed, proceeding with no semantic context");
                Vec::new()
            }
        };

        let seeds: Vec<String> = vector_hits.iter().map(|(p, _)| p.table_name.clone()).collect();
        let graph_futures = seeds.iter().map(|seed| {
            let graph_index = Arc::clone(&self.graph_index);
            let seed = seed.clone();
            async move {
                let related = graph_index
                    .related_tables(connection_id, &seed, DEFAULT_GRAPH_HOP_DEPTH)
                    .await;
                (seed, related)
            }
        });

        let mut graph_related = Vec::with_capacity(seeds.len());
        for (seed, related) in futures::future::join_all(graph_futures).await {
            match related {
                Ok(related) => graph_related.push((seed, related)),
                Err(err) => warn!(%err, %seed, "graph expansion failed for seed table, continuing without it"),
            }
        }

        context::merge(&vector_hits, &graph_related, self.max_context_tables)
    }
}

fn format_reply(explanation: &str, execution: &ExecutionResult) -> String {
    if matches!(execution.status, ExecutionStatus::Truncated) {
        format!(
            "{explanation} (showing the first {} row(s); more were available)",
            execution.row_count
        )
    } else {
        explanation.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_core::{DatabaseKind, DriverFactory};
    use nldb_events::EventBus;
    use nldb_executor::ExecutorPolicy;
    use nldb_graph::InMemoryGraphStore;
    use nldb_storage::{ControlPlaneStore, Database, SurrealStore};
    use nldb_test::mock_llm::{MockEmbedder, MockLlmProvider, ScriptedReply};
    use nldb_test::mocks::RecordingDriverFactory;
    use nldb_vector::InMemoryVectorStore;
    use std::collections::HashMap;

    async fn connection_manager() -> Arc<ConnectionManager> {
        let db = Database::connect_memory().await.unwrap();
        let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));
        let factory: Arc<dyn DriverFactory> = Arc::new(RecordingDriverFactory::new());
        Arc::new(ConnectionManager::new(store, factory, EventBus::new(), vec![]))
    }

    fn orchestrator_with(
        connections: Arc<ConnectionManager>,
        classification_reply: &str,
        synthesis_reply: &str,
    ) -> Orchestrator {
        let classifier_provider =
            Arc::new(MockLlmProvider::new().with_reply(ScriptedReply::text(classification_reply)));
        let classifier = Arc::new(Classifier::new(classifier_provider));

        let synth_provider =
            Arc::new(MockLlmProvider::new().with_reply(ScriptedReply::text(synthesis_reply)));
        let synthesizer = Arc::new(QuerySynthesizer::new(synth_provider));

        let vector_index = Arc::new(VectorIndex::new(Arc::new(InMemoryVectorStore::new())));
        let graph_index = Arc::new(GraphIndex::new(Arc::new(InMemoryGraphStore::new())));
        let executor = Arc::new(QueryExecutor::new(Arc::clone(&connections), ExecutorPolicy::default()));
        let embedder = Arc::new(MockEmbedder::default());

        Orchestrator::new(
            classifier,
            vector_index,
            graph_index,
            synthesizer,
            executor,
            connections,
            embedder,
        )
    }

    async fn establish_connection(connections: &ConnectionManager, user_id: UserId) -> ConnectionId {
        connections
            .establish(
                user_id,
                "pg",
                DatabaseKind::Postgres,
                "localhost",
                5432,
                "app",
                "app",
                "secret",
                HashMap::new(),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn general_chat_short_circuits_before_any_database_collaborator() {
        let connections = connection_manager().await;
        let orchestrator = orchestrator_with(connections, "false, just chatting", "{}");
        let outcome = orchestrator
            .handle_turn(UserId::new(), SessionId::new(), None, "hello there")
            .await
            .unwrap();

        assert!(!outcome.query_intent);
        assert!(outcome.context_tables.is_empty());
        assert!(outcome.generated_query.is_none());
        assert!(outcome.execution.is_none());
    }

    #[tokio::test]
    async fn query_intent_without_a_bound_connection_is_rejected() {
        let connections = connection_manager().await;
        let orchestrator = orchestrator_with(connections, "true", "{}");

        let result = orchestrator
            .handle_turn(UserId::new(), SessionId::new(), None, "how many orders do we have")
            .await;

        assert!(matches!(result, Err(nldb_core::AppError::Validation(_))));
    }

    #[tokio::test]
    async fn query_intent_happy_path_runs_the_full_pipeline() {
        let connections = connection_manager().await;
        let user_id = UserId::new();
        let connection_id = establish_connection(&connections, user_id).await;
        let orchestrator = orchestrator_with(
            Arc::clone(&connections),
            "true",
            r#"{"query": "SELECT * FROM orders", "explanation": "Lists every order."}"#,
        );

        let outcome = orchestrator
            .handle_turn(
                user_id,
                SessionId::new(),
                Some(connection_id),
                "how many orders do we have",
            )
            .await
            .unwrap();

        assert!(outcome.query_intent);
        assert_eq!(outcome.generated_query.as_deref(), Some("SELECT * FROM orders"));
        assert!(outcome.execution.is_some());
    }

    #[tokio::test]
    async fn blocked_query_surfaces_as_an_error_without_touching_the_driver() {
        let connections = connection_manager().await;
        let user_id = UserId::new();
        let connection_id = establish_connection(&connections, user_id).await;
        let orchestrator = orchestrator_with(
            Arc::clone(&connections),
            "true",
            r#"{"query": "DROP TABLE orders", "explanation": "Drops the table."}"#,
        );

        let result = orchestrator
            .handle_turn(
                user_id,
                SessionId::new(),
                Some(connection_id),
                "delete everything",
            )
            .await;

        assert!(matches!(result, Err(nldb_core::AppError::Blocked(_))));
    }
}
