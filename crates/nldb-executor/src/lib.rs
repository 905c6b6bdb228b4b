//! `QueryExecutor`: denylist safety policy and bounded dispatch to live
//! connections.
//!
//! # Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use nldb_executor::{ExecutorPolicy, QueryExecutor};
//!
//! let executor = QueryExecutor::new(connections, ExecutorPolicy::default());
//! let result = executor.execute("SELECT 1", connection_id, user_id, 100).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod executor;
mod policy;
pub mod prelude;
mod scrub;

pub use error::{ExecutorError, ExecutorResult};
pub use executor::{ExecutionResult, ExecutionStatus, ExecutorPolicy, QueryExecutor};
pub use policy::DEFAULT_DENYLIST;
