//! `Orchestrator`: the per-turn pipeline tying classification, context
//! retrieval, synthesis, and execution together.
//!
//! # Example
//! ```rust,ignore
//! use nldb_orchestrator::Orchestrator;
//!
//! let orchestrator = Orchestrator::new(
//!     classifier, vector_index, graph_index, synthesizer, executor, connections, embedder,
//! );
//! let outcome = orchestrator
//!     .handle_turn(user_id, session_id, connection_id, "how many orders do we have?")
//!     .await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod context;
mod error;
mod orchestrator;
pub mod prelude;

pub use error::OrchestratorError;
pub use orchestrator::{
    Orchestrator, TurnOutcome, DEFAULT_GENERAL_TIMEOUT, DEFAULT_GRAPH_HOP_DEPTH, DEFAULT_MAX_ROWS,
    DEFAULT_QUERY_INTENT_TIMEOUT,
};
