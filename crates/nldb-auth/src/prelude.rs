//! Convenience re-exports for call sites that depend on `nldb-auth`.

pub use crate::{AuthManager, AuthManagerError, AuthManagerResult};
