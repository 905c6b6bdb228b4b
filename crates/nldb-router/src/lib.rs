//! `Router`: session-validated, framework-free entry points for the
//! external HTTP layer. The HTTP surface itself (method, path, status
//! codes) is implemented by an external controller layer; this crate
//! exposes the equivalent in-process entry points it calls into.
//!
//! # Example
//! ```rust,ignore
//! use nldb_router::Router;
//!
//! let router = Router::new(auth, connections, orchestrator, schema);
//! let turn = router
//!     .handle_chat_message(session_id, connection_id, "how many orders do we have?")
//!     .await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod router;
pub mod prelude;
mod status;

pub use router::Router;
pub use status::http_status;
