//! Convenience re-exports for consumers of `nldb-orchestrator`.

pub use crate::{
    Orchestrator, OrchestratorError, TurnOutcome, DEFAULT_GENERAL_TIMEOUT, DEFAULT_GRAPH_HOP_DEPTH,
    DEFAULT_MAX_ROWS, DEFAULT_QUERY_INTENT_TIMEOUT,
};
