//! `Router`: the session-validated surface the external controller layer
//! sits behind. Every method here corresponds to one HTTP endpoint; this
//! crate does not itself speak HTTP, only plain async entry points.
//!
//! `Router` does not inspect the content of user messages, only their
//! envelope (session id, connection id). Text-level decisions belong to
//! `Classifier`, reached through `Orchestrator`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use nldb_auth::AuthManager;
use nldb_connections::{ConnectionManager, ConnectionStatus};
use nldb_core::{
    AppResult, ConnectionId, ConversationTurn, DatabaseKind, QueryResult, RequestId, SavedConnection,
    Session, SessionId, User,
};
use nldb_executor::ExecutionStatus;
use nldb_orchestrator::Orchestrator;
use nldb_schema::SchemaIngestor;
use tracing::warn;

/// Session-validated, framework-free entry points for the external
/// controller layer.
pub struct Router {
    auth: Arc<AuthManager>,
    connections: Arc<ConnectionManager>,
    orchestrator: Arc<Orchestrator>,
    schema: Arc<SchemaIngestor>,
}

impl Router {
    /// Build a router dispatching to `auth`, `connections`, `orchestrator`,
    /// and `schema`.
    #[must_use]
    pub fn new(
        auth: Arc<AuthManager>,
        connections: Arc<ConnectionManager>,
        orchestrator: Arc<Orchestrator>,
        schema: Arc<SchemaIngestor>,
    ) -> Self {
        Self {
            auth,
            connections,
            orchestrator,
            schema,
        }
    }

    /// Walk `connection_id`'s schema through its live driver and keep
    /// `VectorIndex`/`GraphIndex` current. Best-effort: a failure here is
    /// logged and does not fail the connect call that triggered it, since
    /// the connection itself is already usable for raw query execution
    /// without schema context.
    async fn ingest_schema(&self, connection_id: ConnectionId, user_id: nldb_core::UserId) {
        let (kind, driver) = match (
            self.connections.connection_kind(connection_id, user_id).await,
            self.connections.live_driver(connection_id, user_id).await,
        ) {
            (Ok(kind), Ok(driver)) => (kind, driver),
            (Err(err), _) | (_, Err(err)) => {
                warn!(%connection_id, %err, "schema ingestion skipped: connection unavailable");
                return;
            }
        };

        match self.schema.ingest(connection_id, user_id, kind, &driver).await {
            Ok(summary) if summary.error.is_some() => {
                warn!(%connection_id, error = ?summary.error, "schema ingestion completed with errors");
            }
            Ok(_) => {}
            Err(err) => warn!(%connection_id, %err, "schema ingestion failed"),
        }
    }

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// See [`AuthManager::register`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        Ok(self.auth.register(username, email, password).await?)
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// See [`AuthManager::login`].
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> AppResult<(User, Session)> {
        Ok(self.auth.login(username, password, user_agent, ip_address).await?)
    }

    /// `POST /auth/logout`.
    ///
    /// # Errors
    ///
    /// See [`AuthManager::logout`].
    pub async fn logout(&self, session_id: SessionId) -> AppResult<()> {
        Ok(self.auth.logout(session_id).await?)
    }

    /// `POST /auth/change-password`. Requires a current session rather than
    /// a bare user id, so a revoked or expired session cannot change the
    /// password it was issued under.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] or
    /// [`AuthManager::change_password`] returns.
    pub async fn change_password(
        &self,
        session_id: SessionId,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let session = self.auth.validate_session(session_id).await?;
        Ok(self
            .auth
            .change_password(session.user_id, current_password, new_password)
            .await?)
    }

    /// `POST /database/connect`. Triggers a best-effort schema walk after
    /// the connection is established (spec's "on-connect schema walk +
    /// embedding upsert"); a failure there does not fail the connect call.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] or
    /// [`ConnectionManager::establish`] returns.
    #[allow(clippy::too_many_arguments)]
    pub async fn connect(
        &self,
        session_id: SessionId,
        name: &str,
        kind: DatabaseKind,
        host: &str,
        port: u16,
        database: &str,
        username: &str,
        password: &str,
        additional_properties: HashMap<String, String>,
    ) -> AppResult<SavedConnection> {
        let session = self.auth.validate_session(session_id).await?;
        let saved = self
            .connections
            .establish(
                session.user_id,
                name,
                kind,
                host,
                port,
                database,
                username,
                password,
                additional_properties,
            )
            .await?;

        self.ingest_schema(saved.id, session.user_id).await;

        Ok(saved)
    }

    /// `POST /database/connect-saved`. Re-opens a saved profile's live
    /// handle, then re-runs the same best-effort schema walk `connect` does
    /// (idempotent: re-ingesting an unchanged schema is a no-op upsert).
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] or
    /// [`ConnectionManager::connect_saved`] returns.
    pub async fn connect_saved(&self, session_id: SessionId, connection_id: ConnectionId) -> AppResult<()> {
        let session = self.auth.validate_session(session_id).await?;
        self.connections.connect_saved(connection_id, session.user_id).await?;
        self.ingest_schema(connection_id, session.user_id).await;
        Ok(())
    }

    /// `GET /database/connections`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] or
    /// [`ConnectionManager::list_saved`] returns.
    pub async fn list_connections(&self, session_id: SessionId) -> AppResult<Vec<SavedConnection>> {
        let session = self.auth.validate_session(session_id).await?;
        Ok(self.connections.list_saved(session.user_id).await?)
    }

    /// `POST /database/test`. Does not require a session to already own a
    /// connection, only to be authenticated; nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] or
    /// [`ConnectionManager::test`] returns.
    #[allow(clippy::too_many_arguments)]
    pub async fn test_connection(
        &self,
        session_id: SessionId,
        kind: DatabaseKind,
        host: &str,
        port: u16,
        database: &str,
        username: &str,
        password: &str,
        additional_properties: &HashMap<String, String>,
    ) -> AppResult<()> {
        self.auth.validate_session(session_id).await?;
        Ok(self
            .connections
            .test(kind, host, port, database, username, password, additional_properties)
            .await?)
    }

    /// `GET /database/connect/{id}`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] or
    /// [`ConnectionManager::status`] returns.
    pub async fn connection_status(
        &self,
        session_id: SessionId,
        connection_id: ConnectionId,
    ) -> AppResult<ConnectionStatus> {
        let session = self.auth.validate_session(session_id).await?;
        Ok(self.connections.status(connection_id, session.user_id).await?)
    }

    /// `DELETE /database/connect/{id}`: soft-delete, closing the live
    /// handle but keeping the profile's history.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] or
    /// [`ConnectionManager::close`] returns.
    pub async fn disconnect(&self, session_id: SessionId, connection_id: ConnectionId) -> AppResult<()> {
        let session = self.auth.validate_session(session_id).await?;
        Ok(self.connections.close(connection_id, session.user_id).await?)
    }

    /// `DELETE /database/saved/{id}`: hard delete, permanently removing the
    /// profile and purging derived data (vectors, graph edges).
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] or
    /// [`ConnectionManager::delete_saved`] returns.
    pub async fn delete_saved(&self, session_id: SessionId, connection_id: ConnectionId) -> AppResult<()> {
        let session = self.auth.validate_session(session_id).await?;
        Ok(self.connections.delete_saved(connection_id, session.user_id).await?)
    }

    /// `POST /chat/database`. Validates the session, then hands the message
    /// straight to `Orchestrator` without looking at its content; which
    /// connection (if any) applies is whatever the caller supplied, not a
    /// value `Router` looks up on its own.
    ///
    /// Per-request timeouts (30s for a query-intent turn, 10s for general
    /// chat) are enforced inside `Orchestrator::handle_turn` itself, since
    /// only it knows which deadline applies once classification completes.
    ///
    /// A pipeline failure (synthesis, execution, or timeout) does not
    /// surface as `Err`: it comes back as `Ok` with `error` set and
    /// `assistant_message` unset, matching the composed-reply contract for
    /// a turn that failed partway through. Only a failure to even start the
    /// turn (an invalid session) is `Err`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AuthManager::validate_session`] returns.
    pub async fn handle_chat_message(
        &self,
        session_id: SessionId,
        connection_id: Option<ConnectionId>,
        message: &str,
    ) -> AppResult<ConversationTurn> {
        let session = self.auth.validate_session(session_id).await?;
        let request_id = RequestId::new();
        let started_at = Utc::now();

        let turn = match self
            .orchestrator
            .handle_turn(session.user_id, session_id, connection_id, message)
            .await
        {
            Ok(outcome) => ConversationTurn {
                request_id,
                session_id,
                user_message: message.to_string(),
                assistant_message: Some(outcome.assistant_message),
                query_intent: outcome.query_intent,
                context_tables: outcome.context_tables.into_iter().map(|t| t.name).collect(),
                generated_query: outcome.generated_query,
                query_result: outcome.execution.map(|execution| QueryResult {
                    columns: execution.columns,
                    rows: execution.rows,
                    row_count: execution.row_count,
                    truncated: matches!(execution.status, ExecutionStatus::Truncated),
                }),
                error: None,
                started_at,
                completed_at: Some(Utc::now()),
            },
            Err(err) => ConversationTurn {
                request_id,
                session_id,
                user_message: message.to_string(),
                assistant_message: None,
                query_intent: false,
                context_tables: Vec::new(),
                generated_query: None,
                query_result: None,
                error: Some(err.to_string()),
                started_at,
                completed_at: Some(Utc::now()),
            },
        };
        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_classifier::Classifier;
    use nldb_config::SessionConfig;
    use nldb_core::{AppError, AuthErrorKind, DriverFactory};
    use nldb_events::EventBus;
    use nldb_executor::{ExecutorPolicy, QueryExecutor};
    use nldb_graph::{GraphIndex, InMemoryGraphStore};
    use nldb_orchestrator::Orchestrator;
    use nldb_schema::SchemaIngestor;
    use nldb_storage::{ControlPlaneStore, Database, SurrealStore};
    use nldb_synthesizer::QuerySynthesizer;
    use nldb_test::mock_llm::{MockEmbedder, MockLlmProvider, ScriptedReply};
    use nldb_test::mocks::RecordingDriverFactory;
    use nldb_vector::{InMemoryVectorStore, VectorIndex};

    async fn router_with(classification_reply: &str, synthesis_reply: &str) -> Router {
        let db = Database::connect_memory().await.unwrap();
        let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));

        let auth = Arc::new(AuthManager::new(
            Arc::clone(&store),
            EventBus::new(),
            SessionConfig::default(),
        ));

        let factory: Arc<dyn DriverFactory> = Arc::new(RecordingDriverFactory::new());
        let connections = Arc::new(ConnectionManager::new(store, factory, EventBus::new(), vec![]));

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

        let schema = Arc::new(SchemaIngestor::new(
            Arc::clone(&vector_index),
            Arc::clone(&graph_index),
            Arc::clone(&embedder) as Arc<dyn nldb_llm::EmbeddingModel>,
        ));

        let orchestrator = Arc::new(Orchestrator::new(
            classifier,
            vector_index,
            graph_index,
            synthesizer,
            executor,
            Arc::clone(&connections),
            embedder,
        ));

        Router::new(auth, connections, orchestrator, schema)
    }

    async fn registered_session(router: &Router) -> Session {
        router.register("ada", "ada@example.com", "correct-horse-battery").await.unwrap();
        let (_user, session) = router
            .login("ada", "correct-horse-battery", None, None)
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn register_then_login_round_trips_through_validate_session() {
        let router = router_with("false", "{}").await;
        let session = registered_session(&router).await;
        assert!(router.auth.validate_session(session.id).await.is_ok());
    }

    #[tokio::test]
    async fn chat_with_an_invalid_session_is_rejected_without_reaching_the_orchestrator() {
        let router = router_with("true", "{}").await;
        let result = router
            .handle_chat_message(SessionId::new(), None, "how many orders do we have")
            .await;
        assert!(matches!(
            result,
            Err(AppError::Auth {
                kind: AuthErrorKind::SessionNotFound
            })
        ));
    }

    #[tokio::test]
    async fn chat_general_message_does_not_require_a_connection() {
        let router = router_with("false, just chatting", "{}").await;
        let session = registered_session(&router).await;

        let turn = router
            .handle_chat_message(session.id, None, "hello there")
            .await
            .unwrap();

        assert!(!turn.query_intent);
        assert_eq!(turn.session_id, session.id);
        assert!(turn.assistant_message.is_some());
    }

    #[tokio::test]
    async fn chat_query_intent_happy_path_carries_the_generated_query_and_result() {
        let router = router_with(
            "true",
            r#"{"query": "SELECT * FROM orders", "explanation": "Lists every order."}"#,
        )
        .await;
        let session = registered_session(&router).await;
        let saved = router
            .connect(
                session.id,
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
            .unwrap();

        let turn = router
            .handle_chat_message(session.id, Some(saved.id), "how many orders do we have")
            .await
            .unwrap();

        assert!(turn.query_intent);
        assert!(turn.error.is_none());
        assert_eq!(turn.generated_query.as_deref(), Some("SELECT * FROM orders"));
        assert!(turn.query_result.is_some());
    }

    #[tokio::test]
    async fn chat_query_intent_without_a_connection_surfaces_as_a_turn_level_error() {
        let router = router_with("true", "{}").await;
        let session = registered_session(&router).await;

        let turn = router
            .handle_chat_message(session.id, None, "how many orders do we have")
            .await
            .unwrap();

        assert!(turn.assistant_message.is_none());
        assert!(turn.error.is_some());
        assert!(turn.query_result.is_none());
    }

    #[tokio::test]
    async fn connect_triggers_a_best_effort_schema_walk() {
        let db = Database::connect_memory().await.unwrap();
        let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));

        let auth = Arc::new(AuthManager::new(
            Arc::clone(&store),
            EventBus::new(),
            SessionConfig::default(),
        ));

        let factory = Arc::new(RecordingDriverFactory::new());
        let connections = Arc::new(ConnectionManager::new(
            store,
            Arc::clone(&factory) as Arc<dyn DriverFactory>,
            EventBus::new(),
            vec![],
        ));

        let classifier = Arc::new(Classifier::new(Arc::new(MockLlmProvider::new())));
        let synthesizer = Arc::new(QuerySynthesizer::new(Arc::new(MockLlmProvider::new())));
        let vector_index = Arc::new(VectorIndex::new(Arc::new(InMemoryVectorStore::new())));
        let graph_index = Arc::new(GraphIndex::new(Arc::new(InMemoryGraphStore::new())));
        let executor = Arc::new(QueryExecutor::new(Arc::clone(&connections), ExecutorPolicy::default()));
        let embedder: Arc<dyn nldb_llm::EmbeddingModel> = Arc::new(MockEmbedder::default());

        let schema = Arc::new(SchemaIngestor::new(
            Arc::clone(&vector_index),
            Arc::clone(&graph_index),
            Arc::clone(&embedder),
        ));

        let orchestrator = Arc::new(Orchestrator::new(
            classifier,
            vector_index,
            graph_index,
            synthesizer,
            executor,
            Arc::clone(&connections),
            embedder,
        ));

        let router = Router::new(auth, connections, orchestrator, schema);
        let session = registered_session(&router).await;

        router
            .connect(
                session.id,
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
            .unwrap();

        let opened = factory.opened_drivers();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].call_count(), 1, "connect should have run the schema enumeration query");
    }

    #[tokio::test]
    async fn full_connection_lifecycle_through_the_router() {
        let router = router_with("false", "{}").await;
        let session = registered_session(&router).await;

        let saved = router
            .connect(
                session.id,
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
            .unwrap();

        let listed = router.list_connections(session.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);

        assert_eq!(
            router.connection_status(session.id, saved.id).await.unwrap(),
            ConnectionStatus::Active
        );

        router.disconnect(session.id, saved.id).await.unwrap();
        assert!(router.list_connections(session.id).await.unwrap().is_empty());

        router.delete_saved(session.id, saved.id).await.unwrap();
        assert!(matches!(
            router.connection_status(session.id, saved.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
