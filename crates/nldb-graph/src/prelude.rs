//! Convenience re-exports for consumers of this crate.

pub use crate::{GraphError, GraphIndex, GraphResult, GraphStore, InMemoryGraphStore};
