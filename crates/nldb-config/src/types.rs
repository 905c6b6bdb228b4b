//! Configuration struct definitions.

use serde::{Deserialize, Serialize};

/// The fully resolved configuration for one process running the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Deployment topology — collapsed single-process by default.
    #[serde(default)]
    pub deployment: DeploymentConfig,
    /// Control-plane persistence.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Vector store endpoint.
    #[serde(default)]
    pub vector: VectorConfig,
    /// Graph store endpoint.
    #[serde(default)]
    pub graph: GraphConfig,
    /// Embedding model settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Language model settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Session lifecycle defaults.
    #[serde(default)]
    pub session: SessionConfig,
    /// Query execution defaults and safety policy.
    #[serde(default)]
    pub executor: ExecutorConfig,
    /// Credentials for the bootstrap admin account.
    #[serde(default)]
    pub admin: AdminConfig,
}

/// Which node(s) this process plays; the collapsed-process deployment runs
/// all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// Core, Reasoning, and Analysis all run in this process.
    Collapsed,
    /// This process hosts only the Core node (Router/AuthManager/ConnectionManager).
    CoreOnly,
    /// This process hosts only the Reasoning node.
    ReasoningOnly,
    /// This process hosts only the Analysis node.
    AnalysisOnly,
}

impl Default for DeploymentMode {
    fn default() -> Self {
        Self::Collapsed
    }
}

/// Deployment topology configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Which node(s) this process hosts.
    #[serde(default)]
    pub mode: DeploymentMode,
    /// Listen address when this process exposes an RPC surface to other nodes.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_listen_addr() -> String {
    "127.0.0.1:7700".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "mem://".to_string(),
            namespace: "nldb".to_string(),
            database: "main".to_string(),
        }
    }
}

/// Control-plane store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `surrealkv://path` for embedded persistence, `mem://` for in-memory.
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database.
    pub database: String,
}

/// Vector store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    /// Endpoint URL of the vector store collaborator.
    pub endpoint: String,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            endpoint: "memory://vector".to_string(),
        }
    }
}

/// Graph store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Endpoint URL of the graph store collaborator.
    pub endpoint: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            endpoint: "memory://graph".to_string(),
        }
    }
}

/// Embedding model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model identifier.
    pub model: String,
    /// Output vector dimension `D`.
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
        }
    }
}

/// Language model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider identifier (`"claude"`, `"openai-compat"`).
    pub provider: String,
    /// Model name passed to the provider.
    pub model: String,
    /// API key. Never logged; loaded from `NLDB_LLM_API_KEY` by the env layer.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "claude".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key: None,
        }
    }
}

/// Session lifecycle defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session time-to-live, in seconds.
    pub ttl_secs: u64,
    /// Interval between expiry sweeps, in seconds.
    pub sweep_interval_secs: u64,
    /// Consecutive failed logins before an account is locked.
    pub max_failed_logins: u32,
    /// Lockout duration, in seconds.
    pub lockout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            sweep_interval_secs: 300,
            max_failed_logins: 5,
            lockout_secs: 1800,
        }
    }
}

/// Query execution defaults and safety policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Default query timeout, in milliseconds.
    pub default_timeout_ms: u64,
    /// Default row cap when the caller does not specify one.
    pub default_max_rows: u64,
    /// Statement-prefix tokens that are blocked by default.
    pub denylist: Vec<String>,
    /// If `true`, denylist matches are logged but still executed.
    pub warn_only: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 30_000,
            default_max_rows: 1000,
            denylist: vec![
                "drop".into(),
                "delete".into(),
                "truncate".into(),
                "alter".into(),
                "create".into(),
                "insert".into(),
                "update".into(),
            ],
            warn_only: false,
        }
    }
}

/// Bootstrap admin account configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Admin username, created on first `AuthManager` start if absent.
    pub username: String,
    /// Admin bootstrap password. Never logged.
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deployment: DeploymentConfig::default(),
            storage: StorageConfig::default(),
            vector: VectorConfig::default(),
            graph: GraphConfig::default(),
            embedding: EmbeddingConfig::default(),
            llm: LlmConfig::default(),
            session: SessionConfig::default(),
            executor: ExecutorConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}
