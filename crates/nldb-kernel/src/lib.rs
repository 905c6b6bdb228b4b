//! Composition root: wires every domain component together from a single
//! [`nldb_config::Config`], owns the session-sweep background task, and
//! performs bounded, ordered shutdown.
//!
//! The concrete database driver, vector store, graph store, and LLM
//! provider are external collaborators this core does not implement (see
//! each one's own crate); [`System::bootstrap`] takes them as parameters.
//!
//! # Example
//! ```rust,ignore
//! use nldb_kernel::System;
//!
//! let config = nldb_config::load(None)?;
//! let system = System::bootstrap(config, driver_factory, llm_provider, embedder).await?;
//!
//! nldb_kernel::wait_for_shutdown_signal().await;
//! system.shutdown().await;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;
mod system;

pub use system::{
    spawn_session_sweeper, wait_for_shutdown_signal, ComponentHealth, System, SystemHealth,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
