#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration for the natural-language database exploration core.
//!
//! This crate provides a single [`Config`] type covering control-plane
//! storage, the vector and graph store endpoints, embedding/language model
//! settings, session and executor defaults, and the bootstrap admin
//! account.
//!
//! # Usage
//!
//! ```rust,no_run
//! use nldb_config::Config;
//!
//! let config = nldb_config::load(None).unwrap();
//! println!("Using model: {}", config.llm.model);
//! ```
//!
//! # Precedence
//!
//! From highest to lowest priority:
//!
//! 1. `NLDB_*` environment variables
//! 2. An optional `config.toml` (explicit path, `./nldb.toml`, `$NLDB_HOME`, or the platform config dir)
//! 3. Embedded defaults (see [`types::Config::default`])
//!
//! # Design
//!
//! This crate has no dependencies on other internal crates. It only depends
//! on `serde`, `toml`, `thiserror`, `tracing`, and `directories`.

pub mod env;
pub mod error;
pub mod loader;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use types::{
    AdminConfig, Config, DeploymentConfig, DeploymentMode, EmbeddingConfig, ExecutorConfig,
    GraphConfig, LlmConfig, SessionConfig, StorageConfig, VectorConfig,
};

/// Load configuration with the full precedence chain.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a discovered config file is unreadable,
/// malformed, or an environment override fails to parse.
pub fn load(explicit_path: Option<&std::path::Path>) -> ConfigResult<Config> {
    loader::load(explicit_path)
}
