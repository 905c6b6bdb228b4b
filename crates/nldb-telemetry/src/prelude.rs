//! Prelude module - commonly used types for convenient import.
//!
//! Use `use nldb_telemetry::prelude::*;` to import all essential types.

pub use crate::{TelemetryError, TelemetryResult};
pub use crate::{LogConfig, LogFormat, LogTarget};
pub use crate::{setup_default_logging, setup_logging};
pub use crate::{RequestContext, RequestGuard};
