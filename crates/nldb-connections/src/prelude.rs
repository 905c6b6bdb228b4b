//! Convenience re-exports for consumers of this crate.

pub use crate::{ConnectionDataPurger, ConnectionManager, ConnectionManagerError, ConnectionManagerResult, ConnectionStatus};
