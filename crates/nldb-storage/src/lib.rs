//! Persisted control-plane store for the natural-language database
//! exploration core.
//!
//! Wraps an embedded **`SurrealDB`** (`SurrealKV` storage engine) and exposes
//! a typed [`ControlPlaneStore`] trait over the three persisted tables:
//! `users`, `user_sessions`, and `user_database_connections`.
//!
//! | Deployment | Endpoint |
//! |------------|----------|
//! | Dev / tests | `mem://` (in-memory) |
//! | Production | `surrealkv://path/to/data` (embedded, on-disk) |

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod db;
pub mod error;
pub mod repository;

pub use db::Database;
pub use error::{StorageError, StorageResult};
pub use repository::{ControlPlaneStore, SurrealStore};
