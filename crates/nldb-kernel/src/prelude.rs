//! Convenience re-exports for consumers of `nldb-kernel`.

pub use crate::{
    spawn_session_sweeper, wait_for_shutdown_signal, ComponentHealth, System, SystemHealth,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
