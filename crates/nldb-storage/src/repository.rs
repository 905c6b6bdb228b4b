//! The `ControlPlaneStore` collaborator: persisted Users, Sessions, and
//! `SavedConnections`, backed by `SurrealDB`.

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use nldb_core::{ConnectionId, Role, SavedConnection, Session, SessionId, User, UserId};
use serde::{Deserialize, Serialize};

const USERS_TABLE: &str = "users";
const SESSIONS_TABLE: &str = "user_sessions";
const CONNECTIONS_TABLE: &str = "user_database_connections";

/// The persisted control-plane store: Users, Sessions, and
/// `SavedConnections`. `AuthManager` and `ConnectionManager` are the only
/// components that call this directly.
#[async_trait]
pub trait ControlPlaneStore: Send + Sync {
    /// Persist a newly registered user.
    async fn create_user(&self, user: &User) -> StorageResult<()>;

    /// Look up a user by username (unique).
    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Look up a user by email (unique).
    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Look up a user by id.
    async fn get_user_by_id(&self, id: UserId) -> StorageResult<Option<User>>;

    /// Whether any user currently holds the `Admin` role. Used by the
    /// bootstrap step to decide whether a default admin needs creating.
    async fn any_admin_exists(&self) -> StorageResult<bool>;

    /// Replace a user's stored record (used for password change, failed
    /// login bookkeeping, and lockout).
    async fn update_user(&self, user: &User) -> StorageResult<()>;

    /// Persist a newly created session.
    async fn create_session(&self, session: &Session) -> StorageResult<()>;

    /// Look up a session by id.
    async fn get_session(&self, id: SessionId) -> StorageResult<Option<Session>>;

    /// Replace a session's stored record (status transitions).
    async fn update_session(&self, session: &Session) -> StorageResult<()>;

    /// All sessions currently `Active` in storage, for the expiry sweep.
    async fn list_active_sessions(&self) -> StorageResult<Vec<Session>>;

    /// Persist a newly saved connection profile.
    async fn create_saved_connection(&self, conn: &SavedConnection) -> StorageResult<()>;

    /// Look up a saved connection by id, including soft-deleted ones.
    async fn get_saved_connection(&self, id: ConnectionId)
    -> StorageResult<Option<SavedConnection>>;

    /// Active (non soft-deleted) saved connections owned by `user_id`.
    async fn list_saved_connections(&self, user_id: UserId) -> StorageResult<Vec<SavedConnection>>;

    /// Whether an active connection named `name` already exists for `user_id`.
    async fn connection_name_exists(&self, user_id: UserId, name: &str) -> StorageResult<bool>;

    /// Replace a saved connection's stored record.
    async fn update_saved_connection(&self, conn: &SavedConnection) -> StorageResult<()>;

    /// Permanently remove a saved connection's stored record.
    async fn hard_delete_saved_connection(&self, id: ConnectionId) -> StorageResult<()>;
}

/// `SurrealDB`-backed [`ControlPlaneStore`].
pub struct SurrealStore {
    db: Database,
}

impl SurrealStore {
    /// Wrap an already-connected [`Database`].
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

// SurrealDB record wrappers carry the record's primary key (the id's
// string form) alongside the domain struct, since typed `select`/`update`
// calls address records by `(table, key)`.

#[derive(Serialize, Deserialize)]
struct UserRecord {
    #[serde(flatten)]
    user: User,
}

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    #[serde(flatten)]
    session: Session,
}

#[derive(Serialize, Deserialize)]
struct ConnectionRecord {
    #[serde(flatten)]
    conn: SavedConnection,
}

#[async_trait]
impl ControlPlaneStore for SurrealStore {
    async fn create_user(&self, user: &User) -> StorageResult<()> {
        let key = user.id.to_string();
        let _: Option<UserRecord> = self
            .db
            .client()
            .create((USERS_TABLE, key))
            .content(UserRecord { user: user.clone() })
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let mut response = self
            .db
            .client()
            .query("SELECT * FROM type::table($table) WHERE username = $username")
            .bind(("table", USERS_TABLE))
            .bind(("username", username.to_string()))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        let records: Vec<UserRecord> = response
            .take(0)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(records.into_iter().next().map(|r| r.user))
    }

    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let mut response = self
            .db
            .client()
            .query("SELECT * FROM type::table($table) WHERE email = $email")
            .bind(("table", USERS_TABLE))
            .bind(("email", email.to_string()))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        let records: Vec<UserRecord> = response
            .take(0)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(records.into_iter().next().map(|r| r.user))
    }

    async fn get_user_by_id(&self, id: UserId) -> StorageResult<Option<User>> {
        let record: Option<UserRecord> = self
            .db
            .client()
            .select((USERS_TABLE, id.to_string()))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(record.map(|r| r.user))
    }

    async fn any_admin_exists(&self) -> StorageResult<bool> {
        let mut response = self
            .db
            .client()
            .query("SELECT * FROM type::table($table) WHERE role = 'admin' LIMIT 1")
            .bind(("table", USERS_TABLE))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        let records: Vec<UserRecord> = response
            .take(0)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(!records.is_empty())
    }

    async fn update_user(&self, user: &User) -> StorageResult<()> {
        let key = user.id.to_string();
        let _: Option<UserRecord> = self
            .db
            .client()
            .update((USERS_TABLE, key))
            .content(UserRecord { user: user.clone() })
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(())
    }

    async fn create_session(&self, session: &Session) -> StorageResult<()> {
        let key = session.id.to_string();
        let _: Option<SessionRecord> = self
            .db
            .client()
            .create((SESSIONS_TABLE, key))
            .content(SessionRecord {
                session: session.clone(),
            })
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> StorageResult<Option<Session>> {
        let record: Option<SessionRecord> = self
            .db
            .client()
            .select((SESSIONS_TABLE, id.to_string()))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(record.map(|r| r.session))
    }

    async fn update_session(&self, session: &Session) -> StorageResult<()> {
        let key = session.id.to_string();
        let _: Option<SessionRecord> = self
            .db
            .client()
            .update((SESSIONS_TABLE, key))
            .content(SessionRecord {
                session: session.clone(),
            })
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(())
    }

    async fn list_active_sessions(&self) -> StorageResult<Vec<Session>> {
        let mut response = self
            .db
            .client()
            .query("SELECT * FROM type::table($table) WHERE status = 'active'")
            .bind(("table", SESSIONS_TABLE))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        let records: Vec<SessionRecord> = response
            .take(0)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.session).collect())
    }

    async fn create_saved_connection(&self, conn: &SavedConnection) -> StorageResult<()> {
        let key = conn.id.to_string();
        let _: Option<ConnectionRecord> = self
            .db
            .client()
            .create((CONNECTIONS_TABLE, key))
            .content(ConnectionRecord { conn: conn.clone() })
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(())
    }

    async fn get_saved_connection(
        &self,
        id: ConnectionId,
    ) -> StorageResult<Option<SavedConnection>> {
        let record: Option<ConnectionRecord> = self
            .db
            .client()
            .select((CONNECTIONS_TABLE, id.to_string()))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(record.map(|r| r.conn))
    }

    async fn list_saved_connections(&self, user_id: UserId) -> StorageResult<Vec<SavedConnection>> {
        let mut response = self
            .db
            .client()
            .query(
                "SELECT * FROM type::table($table) WHERE user_id = $user_id AND deleted_at = NONE",
            )
            .bind(("table", CONNECTIONS_TABLE))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        let records: Vec<ConnectionRecord> = response
            .take(0)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.conn).collect())
    }

    async fn connection_name_exists(&self, user_id: UserId, name: &str) -> StorageResult<bool> {
        let connections = self.list_saved_connections(user_id).await?;
        Ok(connections.iter().any(|c| c.name == name))
    }

    async fn update_saved_connection(&self, conn: &SavedConnection) -> StorageResult<()> {
        let key = conn.id.to_string();
        let _: Option<ConnectionRecord> = self
            .db
            .client()
            .update((CONNECTIONS_TABLE, key))
            .content(ConnectionRecord { conn: conn.clone() })
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(())
    }

    async fn hard_delete_saved_connection(&self, id: ConnectionId) -> StorageResult<()> {
        let _: Option<ConnectionRecord> = self
            .db
            .client()
            .delete((CONNECTIONS_TABLE, id.to_string()))
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_core::SessionStatus;

    async fn memory_store() -> SurrealStore {
        let db = Database::connect_memory().await.unwrap();
        SurrealStore::new(db)
    }

    fn sample_user() -> User {
        User {
            id: UserId::new(),
            username: "alice".into(),
            email: "alice@example.test".into(),
            password_hash: "salt:digest".into(),
            role: Role::User,
            status: nldb_core::AccountStatus::Active,
            created_at: chrono::Utc::now(),
            last_login_at: None,
            failed_login_count: 0,
            locked_until: None,
        }
    }

    #[tokio::test]
    async fn creates_and_fetches_user_by_username() {
        let store = memory_store().await;
        let user = sample_user();
        store.create_user(&user).await.unwrap();

        let found = store.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn update_user_persists_lockout() {
        let store = memory_store().await;
        let mut user = sample_user();
        store.create_user(&user).await.unwrap();

        user.failed_login_count = 5;
        user.locked_until = Some(chrono::Utc::now());
        store.update_user(&user).await.unwrap();

        let found = store.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.failed_login_count, 5);
        assert!(found.locked_until.is_some());
    }

    #[tokio::test]
    async fn session_round_trips_and_lists_active() {
        let store = memory_store().await;
        let user = sample_user();
        store.create_user(&user).await.unwrap();

        let session = Session {
            id: SessionId::new(),
            user_id: user.id,
            username: user.username.clone(),
            user_agent: None,
            ip_address: None,
            created_at: chrono::Utc::now(),
            accessed_at: chrono::Utc::now(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
            status: SessionStatus::Active,
        };
        store.create_session(&session).await.unwrap();

        let active = store.list_active_sessions().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, session.id);

        let mut ended = session.clone();
        ended.status = SessionStatus::LoggedOut;
        store.update_session(&ended).await.unwrap();

        let active = store.list_active_sessions().await.unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn connection_name_uniqueness_and_soft_delete() {
        let store = memory_store().await;
        let user = sample_user();
        store.create_user(&user).await.unwrap();

        let conn = SavedConnection {
            id: ConnectionId::new(),
            user_id: user.id,
            name: "prod".into(),
            kind: nldb_core::DatabaseKind::Postgres,
            host: "localhost".into(),
            port: 5432,
            database: "app".into(),
            username: "app".into(),
            password: "hunter2".into(),
            additional_properties: std::collections::HashMap::new(),
            created_at: chrono::Utc::now(),
            last_used_at: None,
            deleted_at: None,
        };
        store.create_saved_connection(&conn).await.unwrap();

        assert!(store.connection_name_exists(user.id, "prod").await.unwrap());
        assert_eq!(store.list_saved_connections(user.id).await.unwrap().len(), 1);

        let mut soft_deleted = conn.clone();
        soft_deleted.deleted_at = Some(chrono::Utc::now());
        store.update_saved_connection(&soft_deleted).await.unwrap();

        assert!(store.list_saved_connections(user.id).await.unwrap().is_empty());
        assert!(!store.connection_name_exists(user.id, "prod").await.unwrap());

        store.hard_delete_saved_connection(conn.id).await.unwrap();
        assert!(store.get_saved_connection(conn.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn any_admin_exists_reflects_role() {
        let store = memory_store().await;
        assert!(!store.any_admin_exists().await.unwrap());

        let mut admin = sample_user();
        admin.username = "root".into();
        admin.role = Role::Admin;
        store.create_user(&admin).await.unwrap();

        assert!(store.any_admin_exists().await.unwrap());
    }
}
