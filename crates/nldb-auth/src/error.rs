//! `AuthManager`'s own error taxonomy, mapped into [`nldb_core::AppError`]
//! at the boundary the Router and Orchestrator sit on.

use nldb_core::{AppError, AuthErrorKind};
use thiserror::Error;

/// Failure modes of `AuthManager` operations.
#[derive(Debug, Error)]
pub enum AuthManagerError {
    /// `register` was called with a username already in use.
    #[error("username already taken")]
    UsernameTaken,
    /// `register` was called with an email already in use.
    #[error("email already taken")]
    EmailTaken,
    /// `register` or `changePassword` supplied a password failing the policy.
    #[error("weak password: {0}")]
    WeakPassword(String),
    /// `login` credentials did not match any account.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// `login` was rejected because the account is locked out.
    #[error("account locked until {until}")]
    Locked {
        /// RFC 3339 timestamp the lockout lifts.
        until: String,
    },
    /// `login` was rejected because the account is not active.
    #[error("account inactive")]
    Inactive,
    /// A session id did not resolve to any stored session.
    #[error("session not found")]
    SessionNotFound,
    /// A session exists but is past its expiry.
    #[error("session expired")]
    SessionExpired,
    /// A session exists but was explicitly revoked.
    #[error("session revoked")]
    SessionRevoked,
    /// `extendSession` was called on a session that is not currently active.
    #[error("session not active")]
    SessionNotActive,
    /// `changePassword` was called with a user id that does not exist.
    #[error("user not found")]
    UserNotFound,
    /// `changePassword`'s supplied current password did not match.
    #[error("current password does not match")]
    BadCurrentPassword,
    /// The caller's role does not satisfy the requested operation.
    #[error("access denied")]
    AccessDenied,
    /// The control-plane store could not be reached.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<AuthManagerError> for AppError {
    fn from(err: AuthManagerError) -> Self {
        match err {
            AuthManagerError::UsernameTaken => AppError::Duplicate("username".to_string()),
            AuthManagerError::EmailTaken => AppError::Duplicate("email".to_string()),
            AuthManagerError::WeakPassword(reason) => AppError::Auth {
                kind: AuthErrorKind::WeakPassword(reason),
            },
            AuthManagerError::InvalidCredentials => AppError::Auth {
                kind: AuthErrorKind::InvalidCredentials,
            },
            AuthManagerError::Locked { until } => AppError::Auth {
                kind: AuthErrorKind::AccountLocked { until },
            },
            AuthManagerError::Inactive => AppError::Auth {
                kind: AuthErrorKind::Inactive,
            },
            AuthManagerError::SessionNotFound => AppError::Auth {
                kind: AuthErrorKind::SessionNotFound,
            },
            AuthManagerError::SessionExpired => AppError::Auth {
                kind: AuthErrorKind::SessionExpired,
            },
            AuthManagerError::SessionRevoked => AppError::Auth {
                kind: AuthErrorKind::SessionRevoked,
            },
            AuthManagerError::SessionNotActive => AppError::Validation(
                "session is not active".to_string(),
            ),
            AuthManagerError::UserNotFound => AppError::NotFound("user".to_string()),
            AuthManagerError::BadCurrentPassword => AppError::Auth {
                kind: AuthErrorKind::InvalidCredentials,
            },
            AuthManagerError::AccessDenied => AppError::Auth {
                kind: AuthErrorKind::AccessDenied,
            },
            AuthManagerError::StorageUnavailable(reason) => AppError::Unreachable(reason),
        }
    }
}

/// Result type returned by every `AuthManager` operation.
pub type AuthManagerResult<T> = Result<T, AuthManagerError>;
