//! Maps [`AppError`] variants onto the HTTP status codes the external
//! controller layer is expected to answer with.

use nldb_core::{AppError, AuthErrorKind};

/// The status code a caller outside this crate should answer with for
/// `err`. Does not inspect or format `err`'s message; callers still need to
/// render the error's `Display` output (or a sanitized form of it) as the
/// response body.
#[must_use]
pub fn http_status(err: &AppError) -> u16 {
    match err {
        AppError::Validation(_) => 400,
        AppError::Auth {
            kind: AuthErrorKind::AccessDenied,
        } => 403,
        AppError::Auth { .. } => 401,
        AppError::NotFound(_) => 404,
        AppError::Duplicate(_) => 409,
        AppError::UpstreamUnavailable(_) => 503,
        AppError::Unreachable(_)
        | AppError::Blocked(_)
        | AppError::DriverError(_)
        | AppError::SynthesisFailed(_)
        | AppError::Timeout(_)
        | AppError::Internal(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn validation_is_400() {
        assert_eq!(http_status(&AppError::Validation("bad".to_string())), 400);
    }

    #[test]
    fn access_denied_is_403_but_other_auth_kinds_are_401() {
        assert_eq!(
            http_status(&AppError::Auth {
                kind: AuthErrorKind::AccessDenied
            }),
            403
        );
        assert_eq!(
            http_status(&AppError::Auth {
                kind: AuthErrorKind::SessionExpired
            }),
            401
        );
    }

    #[test]
    fn not_found_is_404_and_duplicate_is_409() {
        assert_eq!(http_status(&AppError::NotFound("x".to_string())), 404);
        assert_eq!(http_status(&AppError::Duplicate("x".to_string())), 409);
    }

    #[test]
    fn upstream_unavailable_is_503_and_everything_else_is_500() {
        assert_eq!(
            http_status(&AppError::UpstreamUnavailable("llm".to_string())),
            503
        );
        assert_eq!(http_status(&AppError::Blocked("DROP TABLE".to_string())), 500);
        assert_eq!(http_status(&AppError::Timeout(Duration::from_secs(30))), 500);
        assert_eq!(http_status(&AppError::Internal("oops".to_string())), 500);
    }
}
