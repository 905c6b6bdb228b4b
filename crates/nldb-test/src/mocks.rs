//! In-memory recording implementations of the `Driver`/`DriverFactory`
//! boundary, for asserting what the executor actually sent downstream (or
//! didn't, for blocked-query scenarios).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nldb_core::{DatabaseKind, Driver, DriverFactory, DriverFailure, QueryRows};

/// A driver handle that records every query it was asked to run and replays
/// canned [`QueryRows`] keyed by the literal query string, falling back to
/// an empty result set for anything not scripted.
pub struct RecordingDriver {
    queries: Mutex<Vec<String>>,
    responses: HashMap<String, QueryRows>,
    active: Mutex<bool>,
}

impl RecordingDriver {
    /// Create a driver with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            responses: HashMap::new(),
            active: Mutex::new(true),
        }
    }

    /// Script the rows to return for an exact query string.
    #[must_use]
    pub fn with_response(mut self, query: impl Into<String>, rows: QueryRows) -> Self {
        self.responses.insert(query.into(), rows);
        self
    }

    /// Every query this driver was asked to execute, in order.
    #[must_use]
    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Number of queries this driver was asked to execute.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn execute(&self, query: &str, max_rows: usize) -> Result<QueryRows, DriverFailure> {
        self.queries.lock().unwrap().push(query.to_string());
        let mut rows = self.responses.get(query).cloned().unwrap_or_default();
        rows.rows.truncate(max_rows);
        Ok(rows)
    }

    async fn close(&self) -> Result<(), DriverFailure> {
        *self.active.lock().unwrap() = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        *self.active.lock().unwrap()
    }
}

/// A [`DriverFactory`] that always opens a fresh [`RecordingDriver`] and
/// keeps a handle to every driver it has opened, so a test can inspect the
/// driver after `ConnectionManager` has taken ownership of it.
pub struct RecordingDriverFactory {
    opened: Mutex<Vec<Arc<RecordingDriver>>>,
}

impl RecordingDriverFactory {
    /// Create an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Every driver this factory has opened, in order.
    #[must_use]
    pub fn opened_drivers(&self) -> Vec<Arc<RecordingDriver>> {
        self.opened.lock().unwrap().clone()
    }
}

impl Default for RecordingDriverFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriverFactory for RecordingDriverFactory {
    async fn open(
        &self,
        _kind: DatabaseKind,
        _connection_string: &str,
        _username: &str,
        _password: &str,
    ) -> Result<Arc<dyn Driver>, DriverFailure> {
        let driver = Arc::new(RecordingDriver::new());
        self.opened.lock().unwrap().push(driver.clone());
        Ok(driver)
    }
}
