//! `SurrealDB` query engine connection.
//!
//! The [`Database`] struct wraps a `SurrealDB` connection used for every
//! persisted control-plane table (`users`, `user_sessions`,
//! `user_database_connections`).
//!
//! # Connection Strings
//!
//! | Mode | Connection | Backend |
//! |------|-----------|---------  |
//! | Embedded | `surrealkv://path/to/data` | `SurrealKV` |
//! | In-memory (tests, dev) | `mem://` | In-memory |

use crate::error::{StorageError, StorageResult};

/// Re-export `SurrealDB` for direct query access when needed.
pub use surrealdb;

/// `SurrealDB` query engine wrapper for the control-plane store.
pub struct Database {
    inner: surrealdb::Surreal<surrealdb::engine::any::Any>,
}

impl Database {
    /// Connect using a `surrealkv://` or `mem://` endpoint, selecting the
    /// given namespace and database.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] if the connection fails.
    pub async fn connect(endpoint: &str, namespace: &str, database: &str) -> StorageResult<Self> {
        let db: surrealdb::Surreal<surrealdb::engine::any::Any> = surrealdb::Surreal::init();
        db.connect(endpoint)
            .await
            .map_err(|e: surrealdb::Error| StorageError::Connection(e.to_string()))?;
        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e: surrealdb::Error| StorageError::Connection(e.to_string()))?;
        Ok(Self { inner: db })
    }

    /// Connect to an embedded `SurrealDB` with `SurrealKV` storage at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] if the connection fails.
    pub async fn connect_embedded(path: &str) -> StorageResult<Self> {
        Self::connect(&format!("surrealkv://{path}"), "nldb", "main").await
    }

    /// Connect to an in-memory `SurrealDB` (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] if the connection fails.
    pub async fn connect_memory() -> StorageResult<Self> {
        Self::connect("mem://", "nldb", "test").await
    }

    /// Get a reference to the underlying `SurrealDB` client, for direct
    /// `SurrealQL` queries when the typed repository API is not sufficient.
    #[must_use]
    pub fn client(&self) -> &surrealdb::Surreal<surrealdb::engine::any::Any> {
        &self.inner
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
