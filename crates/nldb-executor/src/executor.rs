//! `QueryExecutor`: validates and runs a query on a specific live
//! connection, returning a bounded, safe result.

use std::sync::Arc;
use std::time::Instant;

use nldb_connections::ConnectionManager;
use nldb_core::{ConnectionId, Row, UserId};

use crate::error::{ExecutorError, ExecutorResult};
use crate::policy::{validate, DEFAULT_DENYLIST};

/// Whether every available row was returned, or the result was cut off at
/// `max_rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Every row the driver reported was returned.
    Ok,
    /// More rows were available than `max_rows` permitted.
    Truncated,
}

/// A bounded query result.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Column names, as reported by the driver.
    pub columns: Vec<String>,
    /// Rows, truncated to `max_rows`.
    pub rows: Vec<Row>,
    /// Number of rows in `rows` (not the number available before truncation).
    pub row_count: usize,
    /// Wall-clock time the driver call took, in milliseconds.
    pub execution_ms: u64,
    /// Whether the result was truncated.
    pub status: ExecutionStatus,
}

/// The executor's safety policy: a denylist of mutating-statement keywords,
/// plus the warn-only toggle the spec mandates as explicit configuration
/// rather than the default.
#[derive(Debug, Clone)]
pub struct ExecutorPolicy {
    /// Denylisted statement keywords, checked as whole tokens.
    pub denylist: Vec<String>,
    /// When `true`, a denylist match is logged but not blocked.
    pub warn_only: bool,
}

impl Default for ExecutorPolicy {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(ToString::to_string).collect(),
            warn_only: false,
        }
    }
}

/// Validates and dispatches queries to live connections, through
/// `ConnectionManager`.
pub struct QueryExecutor {
    connections: Arc<ConnectionManager>,
    policy: ExecutorPolicy,
}

impl QueryExecutor {
    /// Build an executor over `connections` using `policy`.
    #[must_use]
    pub fn new(connections: Arc<ConnectionManager>, policy: ExecutorPolicy) -> Self {
        Self { connections, policy }
    }

    /// Check `query` against the denylist without running it.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Blocked`] if `query` matches the denylist
    /// and `warn_only` is `false`.
    pub fn validate(&self, query: &str) -> ExecutorResult<()> {
        validate(query, &self.policy.denylist, self.policy.warn_only)
    }

    /// Validate then run `query` against `connection_id`'s live driver,
    /// truncating the result at `max_rows`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Blocked`] if the query matches the
    /// denylist, [`ExecutorError::NotFound`] if `connection_id` has no live
    /// handle owned by `user_id`, or [`ExecutorError::DriverError`] (with
    /// credentials scrubbed) if the driver call failed.
    pub async fn execute(
        &self,
        query: &str,
        connection_id: ConnectionId,
        user_id: UserId,
        max_rows: usize,
    ) -> ExecutorResult<ExecutionResult> {
        self.validate(query)?;

        let driver = self
            .connections
            .live_driver(connection_id, user_id)
            .await
            .map_err(|_| ExecutorError::NotFound)?;

        let probe_rows = max_rows.saturating_add(1);
        let start = Instant::now();
        let mut result = driver
            .execute(query, probe_rows)
            .await
            .map_err(|err| ExecutorError::DriverError(crate::scrub::scrub_credentials(&err.0)))?;
        let execution_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let status = if result.rows.len() > max_rows {
            result.rows.truncate(max_rows);
            ExecutionStatus::Truncated
        } else {
            ExecutionStatus::Ok
        };

        Ok(ExecutionResult {
            columns: result.columns,
            row_count: result.rows.len(),
            rows: result.rows,
            execution_ms,
            status,
        })
    }
}
