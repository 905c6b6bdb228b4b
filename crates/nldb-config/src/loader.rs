//! Configuration file discovery and loading.
//!
//! Precedence, highest to lowest: environment variable overrides, an
//! optional `config.toml` found by [`discover_config_path`], embedded
//! defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use std::path::{Path, PathBuf};

/// Load configuration: embedded defaults, merged with an optional config
/// file, merged with environment variable overrides.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a discovered config file cannot be read or
/// parsed, or if an environment variable override is malformed.
pub fn load(explicit_path: Option<&Path>) -> ConfigResult<Config> {
    let mut config = Config::default();

    let path = match explicit_path {
        Some(p) => Some(p.to_path_buf()),
        None => discover_config_path(),
    };

    if let Some(path) = path {
        config = load_file(&path)?;
    }

    crate::env::apply_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from a single file, with no defaults layered under it.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Search, in order, `./nldb.toml`, `$NLDB_HOME/config.toml`, and
/// `~/.nldb/config.toml` for a readable config file.
#[must_use]
pub fn discover_config_path() -> Option<PathBuf> {
    let cwd_candidate = PathBuf::from("nldb.toml");
    if cwd_candidate.is_file() {
        return Some(cwd_candidate);
    }

    if let Ok(home_override) = std::env::var("NLDB_HOME") {
        let candidate = PathBuf::from(home_override).join("config.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "nldb") {
        let candidate = dirs.config_dir().join("config.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_file_parses_a_partial_override() {
        let dir = std::env::temp_dir().join(format!("nldb-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
            [session]
            ttl_secs = 60
            sweep_interval_secs = 300
            max_failed_logins = 5
            lockout_secs = 1800
            "#,
        )
        .unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.session.ttl_secs, 60);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_file_reports_missing_file() {
        let result = load_file(Path::new("/nonexistent/nldb-config-test.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
