//! Convenience re-exports for consumers of `nldb-executor`.

pub use crate::{
    ExecutionResult, ExecutionStatus, ExecutorError, ExecutorPolicy, ExecutorResult, QueryExecutor,
    DEFAULT_DENYLIST,
};
