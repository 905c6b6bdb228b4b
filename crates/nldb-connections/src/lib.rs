//! `ConnectionManager`: establishing, listing, testing, and tearing down
//! both live and saved database connections.
//!
//! # Example
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use nldb_connections::ConnectionManager;
//! use nldb_core::{DatabaseKind, DriverFactory, UserId};
//! use nldb_events::EventBus;
//! use nldb_storage::{ControlPlaneStore, Database, SurrealStore};
//!
//! # async fn example(driver_factory: Arc<dyn DriverFactory>) -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect_memory().await?;
//! let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));
//! let manager = ConnectionManager::new(store, driver_factory, EventBus::new(), vec![]);
//!
//! let saved = manager
//!     .establish(
//!         UserId::new(),
//!         "prod",
//!         DatabaseKind::Postgres,
//!         "localhost",
//!         5432,
//!         "app",
//!         "app",
//!         "secret",
//!         HashMap::new(),
//!     )
//!     .await?;
//! manager.close(saved.id, saved.user_id).await?;
//! # Ok(())
//! # }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod connection_string;
mod error;
mod manager;
mod purge;
pub mod prelude;

pub use error::{ConnectionManagerError, ConnectionManagerResult};
pub use manager::{ConnectionManager, ConnectionStatus};
pub use purge::ConnectionDataPurger;
