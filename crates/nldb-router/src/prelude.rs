//! Convenience re-exports for consumers of `nldb-router`.

pub use crate::{http_status, Router};
