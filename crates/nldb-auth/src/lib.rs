//! `AuthManager`: the component owning user registration, login, session
//! lifecycle, password changes, and role-based access checks.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use nldb_auth::AuthManager;
//! use nldb_config::SessionConfig;
//! use nldb_events::EventBus;
//! use nldb_storage::{ControlPlaneStore, Database, SurrealStore};
//!
//! let db = Database::connect_memory().await?;
//! let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));
//! let auth = AuthManager::new(store, EventBus::new(), SessionConfig::default());
//!
//! let user = auth.register("alice", "alice@example.com", "Aa1!aaaa").await?;
//! let (_, session) = auth.login("alice", "Aa1!aaaa", None, None).await?;
//! auth.validate_session(session.id).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod manager;
mod password_policy;
pub mod prelude;

pub use error::{AuthManagerError, AuthManagerResult};
pub use manager::AuthManager;
