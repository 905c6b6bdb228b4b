//! The `Driver` interface: the boundary between `ConnectionManager`/
//! `QueryExecutor` and a concrete database client library.
//!
//! Concrete JDBC/Mongo-equivalent driver implementations are out of scope for
//! this core; this module only names the interface components dispatch
//! against, plus the shape of a query result. Production wiring supplies a
//! [`DriverFactory`] per [`DatabaseKind`](crate::types::DatabaseKind);
//! `nldb-test` supplies a recording in-memory one for assertions.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::DatabaseKind;

/// A single row, as an ordered tuple of JSON values aligned with
/// [`QueryRows::columns`].
pub type Row = Vec<serde_json::Value>;

/// The result of a driver-level query execution, before `maxRows`
/// truncation is applied by `QueryExecutor`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRows {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Rows, each aligned with `columns`.
    pub rows: Vec<Row>,
}

impl QueryRows {
    /// Number of rows returned.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A failure raised by a driver, independent of any particular database
/// client library.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DriverFailure(pub String);

impl DriverFailure {
    /// Build a new driver failure from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A live, driver-specific connection handle.
///
/// Implementors wrap whatever client object the concrete database library
/// hands back from its own connect call (a JDBC `Connection`, a Mongo
/// `Client`, and so on).
#[async_trait]
pub trait Driver: Send + Sync {
    /// Run `query`, returning at most the driver's own notion of "all rows";
    /// truncation to `max_rows` is the caller's responsibility.
    async fn execute(&self, query: &str, max_rows: usize) -> Result<QueryRows, DriverFailure>;

    /// Close the underlying client. Idempotent.
    async fn close(&self) -> Result<(), DriverFailure>;

    /// Whether the handle is still usable.
    fn is_active(&self) -> bool;
}

/// Opens a [`Driver`] for a given [`DatabaseKind`].
///
/// `ConnectionManager` holds one `DriverFactory` per kind and dispatches
/// `establish`/`connectToSaved` to the matching strategy.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Open a new driver handle.
    async fn open(
        &self,
        kind: DatabaseKind,
        connection_string: &str,
        username: &str,
        password: &str,
    ) -> Result<Arc<dyn Driver>, DriverFailure>;
}
