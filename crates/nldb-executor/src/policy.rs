//! Denylist safety policy: blocks mutating operations before they ever
//! reach a driver.

use tracing::warn;

use crate::error::{ExecutorError, ExecutorResult};

/// Default denylisted statement keywords. Matches
/// [`nldb_config::ExecutorConfig::default`]'s list; kept independent since
/// a deployment without `nldb-config` wired in still gets a safe default.
pub const DEFAULT_DENYLIST: &[&str] = &["drop", "delete", "truncate", "alter", "create", "insert", "update"];

fn normalize(query: &str) -> String {
    query.trim().to_ascii_lowercase()
}

fn tokens(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .collect()
}

/// Find the first denylisted keyword present as a whole token in `query`,
/// if any.
#[must_use]
pub fn first_blocked_keyword(query: &str, denylist: &[String]) -> Option<String> {
    let normalized = normalize(query);
    let query_tokens = tokens(&normalized);
    denylist
        .iter()
        .find(|keyword| query_tokens.contains(&keyword.as_str()))
        .cloned()
}

/// Validate `query` against `denylist`. When `warn_only` is set, a match is
/// logged but does not block execution — an explicit, per-deployment
/// configuration toggle, not the default.
///
/// # Errors
///
/// Returns [`ExecutorError::Blocked`] if `query` matches `denylist` and
/// `warn_only` is `false`.
pub fn validate(query: &str, denylist: &[String], warn_only: bool) -> ExecutorResult<()> {
    match first_blocked_keyword(query, denylist) {
        Some(keyword) if warn_only => {
            warn!(%keyword, "query matched denylist, allowing due to warn_only policy");
            Ok(())
        }
        Some(keyword) => Err(ExecutorError::Blocked(keyword)),
        None => Ok(()),
    }
}
