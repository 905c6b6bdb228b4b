//! The hook `ConnectionManager::delete_saved` calls into before confirming
//! a hard delete, so `VectorIndex`/`GraphIndex` data for the connection is
//! purged atomically with the connection record. Kept as a narrow trait
//! here (constructor-injected) rather than a direct dependency on the
//! `nldb-vector`/`nldb-graph` crates, since those sit in the Analysis
//! plane and must not be depended on from the Core node.

use async_trait::async_trait;
use nldb_core::ConnectionId;

/// Something that holds per-connection derived data that must be purged
/// when the connection is hard-deleted.
#[async_trait]
pub trait ConnectionDataPurger: Send + Sync {
    /// Remove every record keyed by `connection_id`. Idempotent.
    async fn purge(&self, connection_id: ConnectionId);
}
