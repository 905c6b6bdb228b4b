//! The workspace-wide closed error taxonomy.
//!
//! Every component crate defines its own narrower error enum and converts
//! into [`AppError`] at the boundary the Orchestrator and Router sit on.

use thiserror::Error;

/// The closed set of error kinds a turn through the system can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    /// A request failed shape or content validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credentials, session, or account state rejected the request.
    #[error("auth error: {kind}")]
    Auth {
        /// Which authentication failure occurred.
        kind: AuthErrorKind,
    },

    /// The referenced entity does not exist (or is not visible to the caller).
    #[error("not found: {0}")]
    NotFound(String),

    /// The entity being created collides with an existing one.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A live connection or external collaborator could not be reached.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// The query was rejected by policy before execution.
    #[error("blocked: {0}")]
    Blocked(String),

    /// The underlying driver returned an error executing a query.
    #[error("driver error: {0}")]
    DriverError(String),

    /// Query synthesis could not produce a usable query.
    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),

    /// An upstream collaborator (LLM, embedding, vector, graph) is unavailable.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The operation did not complete within its deadline.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Anything else, not expected to be handled by the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The reasons an [`AppError::Auth`] can occur.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthErrorKind {
    /// No session exists for the given id.
    #[error("session not found")]
    SessionNotFound,
    /// The session exists but has expired.
    #[error("session expired")]
    SessionExpired,
    /// The session was explicitly revoked (logout) and cannot be reactivated.
    #[error("session revoked")]
    SessionRevoked,
    /// The supplied credentials did not match any account.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The account is locked out after repeated failed logins.
    #[error("account locked until {until}")]
    AccountLocked {
        /// RFC 3339 timestamp the lockout lifts.
        until: String,
    },
    /// The account exists but is not in `Active` status.
    #[error("account inactive")]
    Inactive,
    /// The supplied password does not meet the password policy.
    #[error("password policy violation: {0}")]
    WeakPassword(String),
    /// The account lacks the role required for the requested operation.
    #[error("access denied")]
    AccessDenied,
}

/// Result type used across the workspace's component boundaries.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Auth {
            kind: AuthErrorKind::AccountLocked {
                until: "2026-07-29T00:00:00Z".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "auth error: account locked until 2026-07-29T00:00:00Z"
        );
    }

    #[test]
    fn test_result_type() {
        fn returns_ok() -> AppResult<i32> {
            Ok(42)
        }
        fn returns_err() -> AppResult<i32> {
            Err(AppError::NotFound("session".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
