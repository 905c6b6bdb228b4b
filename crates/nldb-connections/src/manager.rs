//! `ConnectionManager`: establishing, listing, testing, and tearing down
//! database connections, both live (in-process driver handles) and saved
//! (persisted profiles).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use nldb_core::{ConnectionId, DatabaseKind, Driver, DriverFactory, SavedConnection, UserId};
use nldb_events::{EventBus, EventMetadata, NldbEvent};
use nldb_storage::ControlPlaneStore;
use tokio::sync::RwLock;
use tracing::warn;

use crate::connection_string;
use crate::error::{ConnectionManagerError, ConnectionManagerResult};
use crate::purge::ConnectionDataPurger;

/// Whether a saved connection currently has a live driver handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// A live handle is open.
    Active,
    /// No live handle; the profile is dormant but not deleted.
    Inactive,
}

/// Establishing, listing, testing, and tearing down database connections.
pub struct ConnectionManager {
    store: Arc<dyn ControlPlaneStore>,
    driver_factory: Arc<dyn DriverFactory>,
    events: EventBus,
    purgers: Vec<Arc<dyn ConnectionDataPurger>>,
    live: RwLock<HashMap<ConnectionId, Arc<dyn Driver>>>,
}

impl ConnectionManager {
    /// Build a manager over `store`, opening live handles through
    /// `driver_factory`, publishing lifecycle events on `events`, and
    /// notifying `purgers` on every hard delete.
    #[must_use]
    pub fn new(
        store: Arc<dyn ControlPlaneStore>,
        driver_factory: Arc<dyn DriverFactory>,
        events: EventBus,
        purgers: Vec<Arc<dyn ConnectionDataPurger>>,
    ) -> Self {
        Self {
            store,
            driver_factory,
            events,
            purgers,
            live: RwLock::new(HashMap::new()),
        }
    }

    fn to_storage_err(err: nldb_storage::StorageError) -> ConnectionManagerError {
        ConnectionManagerError::StorageUnavailable(err.to_string())
    }

    /// Open a live connection and persist it as a new saved profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::Unsupported`] if `name`, `host`,
    /// `database`, `username`, or `password` is empty, or `port` is `0`;
    /// [`ConnectionManagerError::DuplicateName`] if an active connection
    /// named `name` already exists for `user_id`; or `Unreachable` if the
    /// driver could not be opened.
    #[allow(clippy::too_many_arguments)]
    pub async fn establish(
        &self,
        user_id: UserId,
        name: &str,
        kind: DatabaseKind,
        host: &str,
        port: u16,
        database: &str,
        username: &str,
        password: &str,
        additional_properties: HashMap<String, String>,
    ) -> ConnectionManagerResult<SavedConnection> {
        connection_string::validate(Some(name), host, database, username, password, port)
            .map_err(ConnectionManagerError::Unsupported)?;

        if self
            .store
            .connection_name_exists(user_id, name)
            .await
            .map_err(Self::to_storage_err)?
        {
            return Err(ConnectionManagerError::DuplicateName);
        }

        let conn_str = connection_string::build(kind, host, port, database, &additional_properties);
        let driver = self
            .driver_factory
            .open(kind, &conn_str, username, password)
            .await
            .map_err(|e| ConnectionManagerError::Unreachable(e.0))?;

        let saved = SavedConnection {
            id: ConnectionId::new(),
            user_id,
            name: name.to_string(),
            kind,
            host: host.to_string(),
            port,
            database: database.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            additional_properties,
            created_at: Utc::now(),
            last_used_at: Some(Utc::now()),
            deleted_at: None,
        };

        if let Err(err) = self.store.create_saved_connection(&saved).await {
            let _ = driver.close().await;
            return Err(Self::to_storage_err(err));
        }

        self.live.write().await.insert(saved.id, driver);
        self.events.publish(NldbEvent::ConnectionEstablished {
            metadata: EventMetadata::new("connection_manager"),
            connection_id: saved.id.to_string(),
        });
        Ok(saved)
    }

    /// Open a live handle for an already-saved connection profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::NotFound`] if no active profile
    /// owned by `user_id` matches, or `Unreachable` if the driver could not
    /// be opened.
    pub async fn connect_saved(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> ConnectionManagerResult<()> {
        let mut saved = self.owned_active_connection(connection_id, user_id).await?;

        if self.live.read().await.contains_key(&connection_id) {
            saved.last_used_at = Some(Utc::now());
            self.store
                .update_saved_connection(&saved)
                .await
                .map_err(Self::to_storage_err)?;
            return Ok(());
        }

        let conn_str = connection_string::build(
            saved.kind,
            &saved.host,
            saved.port,
            &saved.database,
            &saved.additional_properties,
        );
        let driver = self
            .driver_factory
            .open(saved.kind, &conn_str, &saved.username, &saved.password)
            .await
            .map_err(|e| ConnectionManagerError::Unreachable(e.0))?;

        saved.last_used_at = Some(Utc::now());
        self.store
            .update_saved_connection(&saved)
            .await
            .map_err(Self::to_storage_err)?;
        self.live.write().await.insert(connection_id, driver);
        self.events.publish(NldbEvent::ConnectionEstablished {
            metadata: EventMetadata::new("connection_manager"),
            connection_id: connection_id.to_string(),
        });
        Ok(())
    }

    /// List every active (non soft-deleted) saved profile owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::StorageUnavailable`] on a storage
    /// failure.
    pub async fn list_saved(&self, user_id: UserId) -> ConnectionManagerResult<Vec<SavedConnection>> {
        self.store
            .list_saved_connections(user_id)
            .await
            .map_err(Self::to_storage_err)
    }

    /// Open then immediately close a driver against the given parameters,
    /// without ever persisting or caching anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::Unsupported`] if `host`, `database`,
    /// `username`, or `password` is empty, or `port` is `0`; or
    /// `Unreachable` if the driver could not be opened.
    #[allow(clippy::too_many_arguments)]
    pub async fn test(
        &self,
        kind: DatabaseKind,
        host: &str,
        port: u16,
        database: &str,
        username: &str,
        password: &str,
        additional_properties: &HashMap<String, String>,
    ) -> ConnectionManagerResult<()> {
        connection_string::validate(None, host, database, username, password, port)
            .map_err(ConnectionManagerError::Unsupported)?;

        let conn_str = connection_string::build(kind, host, port, database, additional_properties);
        let driver = self
            .driver_factory
            .open(kind, &conn_str, username, password)
            .await
            .map_err(|e| ConnectionManagerError::Unreachable(e.0))?;
        if let Err(err) = driver.close().await {
            warn!(%err, "test connection failed to close cleanly, ignoring");
        }
        Ok(())
    }

    /// Close a saved connection's live handle and soft-delete its profile.
    /// The driver close failure is logged but does not prevent the soft
    /// delete from taking effect.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::NotFound`].
    pub async fn close(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> ConnectionManagerResult<()> {
        let mut saved = self.owned_active_connection(connection_id, user_id).await?;

        if let Some(driver) = self.live.write().await.remove(&connection_id) {
            if let Err(err) = driver.close().await {
                warn!(%err, connection_id = %connection_id, "driver close failed during soft delete, continuing");
            }
        }

        saved.deleted_at = Some(Utc::now());
        self.store
            .update_saved_connection(&saved)
            .await
            .map_err(Self::to_storage_err)?;
        self.events.publish(NldbEvent::ConnectionClosed {
            metadata: EventMetadata::new("connection_manager"),
            connection_id: connection_id.to_string(),
        });
        self.events.publish(NldbEvent::ConnectionDeleted {
            metadata: EventMetadata::new("connection_manager"),
            connection_id: connection_id.to_string(),
            hard: false,
        });
        Ok(())
    }

    /// Close any live handle, soft-delete, hard-delete the saved profile,
    /// and purge every derived `VectorIndex`/`GraphIndex` record for this
    /// connection before returning success.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::NotFound`].
    pub async fn delete_saved(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> ConnectionManagerResult<()> {
        let saved = self
            .store
            .get_saved_connection(connection_id)
            .await
            .map_err(Self::to_storage_err)?
            .filter(|c| c.user_id == user_id)
            .ok_or(ConnectionManagerError::NotFound)?;

        if let Some(driver) = self.live.write().await.remove(&connection_id) {
            if let Err(err) = driver.close().await {
                warn!(%err, connection_id = %connection_id, "driver close failed during hard delete, continuing");
            }
        }

        let _ = saved;
        self.store
            .hard_delete_saved_connection(connection_id)
            .await
            .map_err(Self::to_storage_err)?;

        for purger in &self.purgers {
            purger.purge(connection_id).await;
        }

        self.events.publish(NldbEvent::ConnectionDeleted {
            metadata: EventMetadata::new("connection_manager"),
            connection_id: connection_id.to_string(),
            hard: true,
        });
        Ok(())
    }

    /// Whether `connection_id` currently has a live handle open.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::NotFound`].
    pub async fn status(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> ConnectionManagerResult<ConnectionStatus> {
        let _ = self.owned_active_connection(connection_id, user_id).await?;
        if self.live.read().await.contains_key(&connection_id) {
            Ok(ConnectionStatus::Active)
        } else {
            Ok(ConnectionStatus::Inactive)
        }
    }

    /// Fetch the live driver handle for `connection_id`, for a component
    /// (such as `QueryExecutor`) that needs to run a query against it
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::NotFound`] if the profile is not
    /// owned by `user_id`, is soft-deleted, or has no live handle open.
    pub async fn live_driver(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> ConnectionManagerResult<Arc<dyn Driver>> {
        let _ = self.owned_active_connection(connection_id, user_id).await?;
        self.live
            .read()
            .await
            .get(&connection_id)
            .cloned()
            .ok_or(ConnectionManagerError::NotFound)
    }

    /// Which database kind `connection_id` targets, for a component (such as
    /// `Orchestrator`) that needs to pick a dialect without holding its own
    /// copy of the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionManagerError::NotFound`] if the profile is not
    /// owned by `user_id` or is soft-deleted.
    pub async fn connection_kind(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> ConnectionManagerResult<DatabaseKind> {
        let saved = self.owned_active_connection(connection_id, user_id).await?;
        Ok(saved.kind)
    }

    /// Close every live handle exactly once. Intended to run during process
    /// shutdown.
    pub async fn shutdown(&self) {
        let mut live = self.live.write().await;
        for (connection_id, driver) in live.drain() {
            if let Err(err) = driver.close().await {
                warn!(%err, connection_id = %connection_id, "driver close failed during shutdown");
            }
        }
    }

    async fn owned_active_connection(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> ConnectionManagerResult<SavedConnection> {
        self.store
            .get_saved_connection(connection_id)
            .await
            .map_err(Self::to_storage_err)?
            .filter(|c| c.user_id == user_id && c.is_active())
            .ok_or(ConnectionManagerError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_storage::{Database, SurrealStore};
    use nldb_test::mocks::RecordingDriverFactory;

    async fn manager() -> (ConnectionManager, Arc<RecordingDriverFactory>) {
        let db = Database::connect_memory().await.unwrap();
        let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));
        let factory = Arc::new(RecordingDriverFactory::new());
        let manager = ConnectionManager::new(store, factory.clone(), EventBus::new(), vec![]);
        (manager, factory)
    }

    #[tokio::test]
    async fn establish_rejects_duplicate_name() {
        let (manager, _factory) = manager().await;
        let user_id = UserId::new();
        manager
            .establish(
                user_id,
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

        let result = manager
            .establish(
                user_id,
                "pg",
                DatabaseKind::Postgres,
                "localhost",
                5432,
                "app",
                "app",
                "secret",
                HashMap::new(),
            )
            .await;
        assert!(matches!(result, Err(ConnectionManagerError::DuplicateName)));
    }

    #[tokio::test]
    async fn close_then_delete_saved_purges_and_hard_deletes() {
        let (manager, _factory) = manager().await;
        let user_id = UserId::new();
        let saved = manager
            .establish(
                user_id,
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

        assert_eq!(
            manager.status(saved.id, user_id).await.unwrap(),
            ConnectionStatus::Active
        );

        manager.close(saved.id, user_id).await.unwrap();
        assert!(matches!(
            manager.status(saved.id, user_id).await,
            Err(ConnectionManagerError::NotFound)
        ));

        manager.delete_saved(saved.id, user_id).await.unwrap();
        let found = manager.list_saved(user_id).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn list_saved_only_returns_active_profiles() {
        let (manager, _factory) = manager().await;
        let user_id = UserId::new();
        manager
            .establish(
                user_id,
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

        assert_eq!(manager.list_saved(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn live_driver_returns_not_found_once_closed() {
        let (manager, _factory) = manager().await;
        let user_id = UserId::new();
        let saved = manager
            .establish(
                user_id,
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

        assert!(manager.live_driver(saved.id, user_id).await.is_ok());
        manager.close(saved.id, user_id).await.unwrap();
        assert!(matches!(
            manager.live_driver(saved.id, user_id).await,
            Err(ConnectionManagerError::NotFound)
        ));
    }

    #[tokio::test]
    async fn establish_rejects_an_empty_host_without_opening_a_driver() {
        let (manager, factory) = manager().await;
        let result = manager
            .establish(
                UserId::new(),
                "pg",
                DatabaseKind::Postgres,
                "",
                5432,
                "app",
                "app",
                "secret",
                HashMap::new(),
            )
            .await;
        assert!(matches!(result, Err(ConnectionManagerError::Unsupported(_))));
        assert!(factory.opened_drivers().is_empty());
    }

    #[tokio::test]
    async fn establish_rejects_a_zero_port() {
        let (manager, factory) = manager().await;
        let result = manager
            .establish(
                UserId::new(),
                "pg",
                DatabaseKind::Postgres,
                "localhost",
                0,
                "app",
                "app",
                "secret",
                HashMap::new(),
            )
            .await;
        assert!(matches!(result, Err(ConnectionManagerError::Unsupported(_))));
        assert!(factory.opened_drivers().is_empty());
    }

    #[tokio::test]
    async fn test_connection_rejects_an_empty_password_without_opening_a_driver() {
        let (manager, factory) = manager().await;
        let result = manager
            .test(
                DatabaseKind::Postgres,
                "localhost",
                5432,
                "app",
                "app",
                "",
                &HashMap::new(),
            )
            .await;
        assert!(matches!(result, Err(ConnectionManagerError::Unsupported(_))));
        assert!(factory.opened_drivers().is_empty());
    }

    #[tokio::test]
    async fn connection_kind_reports_the_saved_profile_kind() {
        let (manager, _factory) = manager().await;
        let user_id = UserId::new();
        let saved = manager
            .establish(
                user_id,
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

        assert_eq!(
            manager.connection_kind(saved.id, user_id).await.unwrap(),
            DatabaseKind::Postgres
        );

        let other_user = UserId::new();
        assert!(matches!(
            manager.connection_kind(saved.id, other_user).await,
            Err(ConnectionManagerError::NotFound)
        ));
    }
}
