//! Shared test utilities for the natural-language database exploration core.
//!
//! This crate provides fixture builders, scriptable mock implementations of
//! the `nldb-llm` traits, and an in-memory `Driver`/`DriverFactory` pair, so
//! domain crates can write end-to-end tests without a real database, LLM
//! API, or driver.
//!
//! # Usage
//!
//! Add to a crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! nldb-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use nldb_test::prelude::*;
//!
//!     #[tokio::test]
//!     async fn example() {
//!         let harness = TestHarness::new().await.unwrap();
//!         let user = test_user("alice");
//!         assert!(!user.username.is_empty());
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mock_llm;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mock_llm::*;
pub use mocks::*;
