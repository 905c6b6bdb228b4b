//! Unified prelude for the natural-language database exploration core.
//!
//! This crate provides a single import to bring in commonly used types from
//! across the workspace. Use this when a call site needs types from several
//! crates without managing individual imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nldb_prelude::*;
//!
//! // Now you have access to types from:
//! // - nldb-core (shared model, errors, ids, the Driver boundary)
//! // - nldb-crypto (password hashing)
//! // - nldb-events (the event bus and domain events)
//! // - nldb-telemetry (logging, request-scoped tracing)
//! // - nldb-storage (the control-plane store)
//! // - nldb-llm (LLM providers, embeddings, messages)
//! // - nldb-auth (AuthManager)
//! // - nldb-connections (ConnectionManager)
//! // - nldb-vector (VectorIndex)
//! // - nldb-graph (GraphIndex)
//! // - nldb-schema (SchemaIngestor)
//! // - nldb-classifier (Classifier)
//! // - nldb-synthesizer (QuerySynthesizer)
//! // - nldb-executor (QueryExecutor)
//! // - nldb-orchestrator (Orchestrator)
//! // - nldb-router (Router)
//! ```
//!
//! # Per-Crate Preludes
//!
//! If only one crate's types are needed, use its own prelude instead:
//!
//! ```rust,ignore
//! use nldb_core::prelude::*;
//! use nldb_llm::prelude::*;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Re-export all crate preludes
pub use nldb_auth::prelude::*;
pub use nldb_connections::prelude::*;
pub use nldb_core::prelude::*;
pub use nldb_classifier::prelude::*;
pub use nldb_graph::prelude::*;
pub use nldb_schema::prelude::*;
pub use nldb_synthesizer::prelude::*;
pub use nldb_executor::prelude::*;
pub use nldb_orchestrator::prelude::*;
pub use nldb_router::prelude::*;
pub use nldb_vector::prelude::*;
pub use nldb_crypto::prelude::*;
pub use nldb_events::prelude::*;
pub use nldb_llm::prelude::*;
pub use nldb_telemetry::prelude::*;

// nldb-config and nldb-storage have no prelude module of their own; their
// public surface is small enough to re-export directly.
pub use nldb_config::{Config, ConfigError, ConfigResult};
pub use nldb_storage::{ControlPlaneStore, Database, StorageError, StorageResult, SurrealStore};
