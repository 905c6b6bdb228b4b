//! End-to-end test harness: a fully in-memory wiring of the ambient stack
//! components a domain crate's integration tests need, so tests never touch
//! a real database, LLM API, or driver.

use std::sync::Arc;

use nldb_events::EventBus;
use nldb_storage::{Database, StorageResult};

use crate::mock_llm::{MockEmbedder, MockLlmProvider};
use crate::mocks::RecordingDriverFactory;

/// Bundles the in-memory collaborators a component needs to run without any
/// external dependency: a fresh `SurrealDB` memory instance, an event bus,
/// a scriptable LLM provider and embedder, and a recording driver factory.
///
/// Build one per test with [`TestHarness::new`], then hand the pieces to
/// whichever components the test under construction needs.
pub struct TestHarness {
    /// In-memory control-plane store.
    pub database: Database,
    /// Event bus, shared across every component the test wires up.
    pub events: EventBus,
    /// Scriptable LLM provider; queue replies with `llm.with_reply(...)`
    /// before handing `Arc::clone(&harness.llm)` to a component.
    pub llm: Arc<MockLlmProvider>,
    /// Deterministic embedder for vector-index tests.
    pub embedder: Arc<MockEmbedder>,
    /// Recording driver factory; inspect `driver_factory.opened_drivers()`
    /// after a test to assert which queries were sent downstream.
    pub driver_factory: Arc<RecordingDriverFactory>,
}

impl TestHarness {
    /// Build a fresh harness backed by an in-memory `SurrealDB` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database fails to initialize,
    /// which should not happen outside of resource exhaustion.
    pub async fn new() -> StorageResult<Self> {
        Ok(Self {
            database: Database::connect_memory().await?,
            events: EventBus::new(),
            llm: Arc::new(MockLlmProvider::new()),
            embedder: Arc::new(MockEmbedder::default()),
            driver_factory: Arc::new(RecordingDriverFactory::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_llm::EmbeddingModel;

    #[tokio::test]
    async fn harness_builds_a_working_memory_database() {
        let harness = TestHarness::new().await.unwrap();
        assert_eq!(harness.events.subscriber_count(), 0);
        assert_eq!(harness.embedder.dimensions(), 8);
        let _ = harness.database;
        let _ = harness.driver_factory;
    }
}
