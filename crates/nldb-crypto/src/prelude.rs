//! Prelude module - commonly used types for convenient import.
//!
//! Use `use nldb_crypto::prelude::*;` to import all essential types.

pub use crate::{CryptoError, CryptoResult, PasswordHash, Salt};
