//! Foundation types and the shared error taxonomy for the natural-language
//! database exploration core.
//!
//! This crate provides:
//! - [`error::AppError`], the workspace-wide closed error sum type
//! - shared identifier and timestamp types used at every component boundary
//! - a retry-once policy for upstream collaborator calls
//! - the shared data model and the [`driver::Driver`] boundary interface

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod driver;
pub mod error;
pub mod model;
pub mod prelude;
pub mod retry;
pub mod types;

pub use driver::{Driver, DriverFactory, DriverFailure, QueryRows, Row};
pub use error::{AppError, AppResult, AuthErrorKind};
pub use model::{
    AccountStatus, ConversationTurn, LiveConnection, QueryResult, Role, SavedConnection,
    SchemaUnit, Session, SessionStatus, TableRelationship, User,
};
pub use retry::{RetryConfig, RetryOutcome, retry};
pub use types::{ConnectionId, DatabaseKind, RequestId, SessionId, Timestamp, TurnId, UserId};
