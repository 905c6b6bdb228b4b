//! Environment variable fallback resolution.
//!
//! Every override is read with an `NLDB_`-prefixed name; these take
//! precedence over both the embedded defaults and any config file.

use crate::error::ConfigResult;
use crate::types::Config;

/// Apply any present `NLDB_*` environment variables onto `config` in place.
///
/// # Errors
///
/// Returns a [`crate::error::ConfigError`] if a present variable fails to
/// parse into its target type.
pub fn apply_overrides(config: &mut Config) -> ConfigResult<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Same as [`apply_overrides`], but sourcing values from `lookup` instead of
/// the real process environment — used by tests to avoid mutating global
/// state.
///
/// # Errors
///
/// Returns a [`crate::error::ConfigError`] if a present value fails to parse
/// into its target type.
pub fn apply_overrides_from(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    if let Some(v) = lookup("NLDB_STORAGE_URL") {
        config.storage.url = v;
    }
    if let Some(v) = lookup("NLDB_VECTOR_ENDPOINT") {
        config.vector.endpoint = v;
    }
    if let Some(v) = lookup("NLDB_GRAPH_ENDPOINT") {
        config.graph.endpoint = v;
    }
    if let Some(v) = lookup("NLDB_LLM_PROVIDER") {
        config.llm.provider = v;
    }
    if let Some(v) = lookup("NLDB_LLM_MODEL") {
        config.llm.model = v;
    }
    if let Some(v) = lookup("NLDB_LLM_API_KEY") {
        config.llm.api_key = Some(v);
    }
    if let Some(v) = lookup("NLDB_ADMIN_USERNAME") {
        config.admin.username = v;
    }
    if let Some(v) = lookup("NLDB_ADMIN_PASSWORD") {
        config.admin.password = Some(v);
    }
    if let Some(v) = lookup("NLDB_EXECUTOR_WARN_ONLY") {
        config.executor.warn_only = v == "1" || v.eq_ignore_ascii_case("true");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_present_overrides() {
        let mut config = Config::default();
        apply_overrides_from(&mut config, |key| {
            (key == "NLDB_ADMIN_USERNAME").then(|| "root".to_string())
        })
        .unwrap();
        assert_eq!(config.admin.username, "root");
    }

    #[test]
    fn leaves_config_untouched_when_nothing_set() {
        let mut config = Config::default();
        let before = config.admin.username.clone();
        apply_overrides_from(&mut config, |_| None).unwrap();
        assert_eq!(config.admin.username, before);
    }
}
