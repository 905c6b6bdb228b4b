//! Convenience re-exports for downstream component crates.

pub use crate::driver::{Driver, DriverFactory, DriverFailure, QueryRows, Row};
pub use crate::error::{AppError, AppResult, AuthErrorKind};
pub use crate::model::{
    AccountStatus, ConversationTurn, LiveConnection, QueryResult, Role, SavedConnection,
    SchemaUnit, Session, SessionStatus, TableRelationship, User,
};
pub use crate::retry::{RetryConfig, RetryOutcome, retry};
pub use crate::types::{
    ConnectionId, DatabaseKind, RequestId, SessionId, Timestamp, TurnId, UserId,
};
