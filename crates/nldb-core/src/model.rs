//! Shared data model: the record types owned by individual components but
//! passed across every component boundary.

use crate::driver::Row;
use crate::types::{ConnectionId, DatabaseKind, RequestId, SessionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user's access level. Checked by `AuthManager::validate_access`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access, granted to newly registered accounts in some
    /// deployments. Not assigned by `register`; reserved for future use.
    Guest,
    /// Ordinary authenticated user. Default for `register`.
    #[default]
    User,
    /// Full access, including bootstrap-only operations.
    Admin,
}

/// Account lifecycle state, set administratively (not by the failed-login
/// lockout path, which instead uses [`User::locked_until`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Normal, usable account.
    #[default]
    Active,
    /// Deactivated by an administrator; logins are rejected as `Inactive`.
    Inactive,
    /// Suspended by an administrator; logins are rejected as `Inactive`.
    Suspended,
}

/// A registered account. Owned by `AuthManager`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique id.
    pub id: UserId,
    /// Login username, unique across all users.
    pub username: String,
    /// Email address, unique across all users.
    pub email: String,
    /// Stored salted password hash (`nldb_crypto::PasswordHash::to_stored`).
    pub password_hash: String,
    /// Access level.
    #[serde(default)]
    pub role: Role,
    /// Administrative lifecycle state.
    #[serde(default)]
    pub status: AccountStatus,
    /// When the account was created.
    pub created_at: Timestamp,
    /// When the account last logged in successfully.
    pub last_login_at: Option<Timestamp>,
    /// Consecutive failed login attempts since the last success.
    pub failed_login_count: u32,
    /// If set and in the future, logins are rejected with `AccountLocked`.
    pub locked_until: Option<Timestamp>,
}

/// The lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Usable for authenticated calls.
    Active,
    /// Past its expiry; reads and writes are rejected.
    Expired,
    /// Ended by an explicit logout.
    LoggedOut,
}

/// An authenticated session. Owned by `AuthManager`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique id, presented by the caller on every subsequent request.
    pub id: SessionId,
    /// The authenticated user.
    pub user_id: UserId,
    /// Denormalized for display without a join back to `users`.
    pub username: String,
    /// User-Agent header supplied at login, if any.
    pub user_agent: Option<String>,
    /// Remote address supplied at login, if any.
    pub ip_address: Option<String>,
    /// When the session was created.
    pub created_at: Timestamp,
    /// Updated on every `validateSession` call, best-effort.
    pub accessed_at: Timestamp,
    /// When the session stops being valid absent activity.
    pub expires_at: Timestamp,
    /// Current lifecycle state.
    pub status: SessionStatus,
}

impl Session {
    /// Whether this session is usable as of `now`, applying lazy expiry:
    /// a session past `expires_at` is treated as expired even if its
    /// persisted `status` has not yet been swept to `Expired`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.status == SessionStatus::Active && self.expires_at > now
    }
}

/// A saved, possibly-dormant database connection profile. Owned by
/// `ConnectionManager`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedConnection {
    /// Unique id.
    pub id: ConnectionId,
    /// Owning user.
    pub user_id: UserId,
    /// User-chosen display name, unique per user.
    pub name: String,
    /// Which kind of database this profile connects to.
    pub kind: DatabaseKind,
    /// Host name or address.
    pub host: String,
    /// Port number.
    pub port: u16,
    /// Database/catalog name on the target server.
    pub database: String,
    /// Login username on the target server.
    pub username: String,
    /// Login password on the target server. Encryption-at-rest is an
    /// assumed-external concern the specification this implements declares
    /// out of scope; stored as supplied.
    pub password: String,
    /// Driver-specific extra parameters, preserved in the connection string.
    pub additional_properties: HashMap<String, String>,
    /// When this profile was created.
    pub created_at: Timestamp,
    /// Updated only on `establish` and `connectSaved`, never on query execution.
    pub last_used_at: Option<Timestamp>,
    /// Soft-deleted profiles are hidden from listings but not yet purged.
    pub deleted_at: Option<Timestamp>,
}

impl SavedConnection {
    /// Whether this profile is visible in ordinary listings.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// A live, pooled handle to a connected database. Owned by `ConnectionManager`,
/// never persisted.
#[derive(Debug, Clone)]
pub struct LiveConnection {
    /// The saved profile this handle was established from.
    pub connection_id: ConnectionId,
    /// Owning user.
    pub user_id: UserId,
    /// Which kind of database this handle talks to.
    pub kind: DatabaseKind,
    /// When the handle was established.
    pub established_at: Timestamp,
}

/// One column/field/table extracted from a connection's schema. Owned by
/// `SchemaIngestor`; embeddings keyed by this unit's id live in `VectorIndex`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaUnit {
    /// Unique id.
    pub id: String,
    /// Connection this unit was extracted from.
    pub connection_id: ConnectionId,
    /// Fully qualified name, e.g. `public.orders` or `public.orders.total`.
    pub qualified_name: String,
    /// `"table"`, `"column"`, or `"collection"`/`"field"` for document stores.
    pub unit_kind: String,
    /// Declared or inferred data type, where applicable.
    pub data_type: Option<String>,
    /// Free-text description synthesized for embedding and prompt context.
    pub description: String,
}

/// A foreign-key or inferred join relationship between two tables. Owned by
/// `GraphIndex`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRelationship {
    /// Connection this relationship belongs to.
    pub connection_id: ConnectionId,
    /// Qualified name of the source table.
    pub from_table: String,
    /// Qualified name of the target table.
    pub to_table: String,
    /// Column on the source table participating in the relationship.
    pub from_column: String,
    /// Column on the target table participating in the relationship.
    pub to_column: String,
    /// `"foreign_key"` or `"inferred"`.
    pub relationship_kind: String,
}

/// A bounded, tabular query result, surfaced on a successful query-intent
/// turn. Mirrors the executor's own result shape without pulling a
/// downstream crate's type into this foundation crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names, as reported by the driver.
    pub columns: Vec<String>,
    /// Rows, truncated to the turn's row cap.
    pub rows: Vec<Row>,
    /// Number of rows in `rows`.
    pub row_count: usize,
    /// Whether more rows were available than the cap permitted.
    pub truncated: bool,
}

/// One request/response pair within a conversation. Owned by `Orchestrator`
/// for the lifetime of the chat session (not persisted across process
/// restarts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Correlates every component hop this turn made.
    pub request_id: RequestId,
    /// Owning session.
    pub session_id: SessionId,
    /// The user's natural-language message.
    pub user_message: String,
    /// The system's reply, once the turn completes.
    pub assistant_message: Option<String>,
    /// `true` if this turn classified as query-intent (vs. general chat).
    pub query_intent: bool,
    /// Qualified names of the schema tables given to the synthesizer as
    /// context, empty for general chat.
    pub context_tables: Vec<String>,
    /// The query the synthesizer produced, `None` for general chat or on
    /// failure before synthesis completed.
    pub generated_query: Option<String>,
    /// The executor's tabular result, `None` for general chat or on any
    /// pipeline failure.
    pub query_result: Option<QueryResult>,
    /// A user-safe message describing the failure, if the turn failed at
    /// any pipeline step. `None` on success.
    pub error: Option<String>,
    /// When the turn was started.
    pub started_at: Timestamp,
    /// When the turn completed, if it has.
    pub completed_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn session_lazy_expiry() {
        let now = chrono::Utc::now();
        let session = Session {
            id: SessionId::new(),
            user_id: UserId::new(),
            username: "alice".into(),
            user_agent: None,
            ip_address: None,
            created_at: now - Duration::hours(2),
            accessed_at: now - Duration::hours(2),
            expires_at: now - Duration::hours(1),
            status: SessionStatus::Active,
        };
        assert!(!session.is_active(now));
    }

    #[test]
    fn saved_connection_soft_delete_hides_from_active() {
        let mut conn = SavedConnection {
            id: ConnectionId::new(),
            user_id: UserId::new(),
            name: "prod".into(),
            kind: DatabaseKind::Postgres,
            host: "localhost".into(),
            port: 5432,
            database: "app".into(),
            username: "app".into(),
            password: "hunter2".into(),
            additional_properties: HashMap::new(),
            created_at: chrono::Utc::now(),
            last_used_at: None,
            deleted_at: None,
        };
        assert!(conn.is_active());
        conn.deleted_at = Some(chrono::Utc::now());
        assert!(!conn.is_active());
    }
}
