//! Password hashing for the natural-language database exploration core.
//!
//! This crate provides deterministic salted password hashing —
//! `H(password || salt)` — used by `AuthManager` to store and verify
//! credentials. Hashing primitives themselves are assumed-external in the
//! specification this implements; SHA-256 is the concrete stand-in.
//!
//! # Example
//!
//! ```
//! use nldb_crypto::PasswordHash;
//!
//! let hash = PasswordHash::new("correct horse battery staple");
//! assert!(hash.verify("correct horse battery staple"));
//! assert!(!hash.verify("wrong password"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod password;

pub use error::{CryptoError, CryptoResult};
pub use password::{PasswordHash, Salt};
