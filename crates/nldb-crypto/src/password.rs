//! Deterministic salted password hashing: `H(password || salt)`.
//!
//! The hash function itself is an assumed-external primitive in the
//! specification this crate implements; SHA-256 is used here as the concrete
//! stand-in, matching the `H(password || salt)` construction exactly.

use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;

const SALT_LEN: usize = 16;

/// A randomly generated password salt.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Generate a new random salt.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Encode as a hex string for storage.
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Decode from a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not 16 bytes.
    pub fn from_hex(s: &str) -> Result<Self, crate::CryptoError> {
        let bytes = hex::decode(s).map_err(|_| crate::CryptoError::InvalidHexEncoding)?;
        if bytes.len() != SALT_LEN {
            return Err(crate::CryptoError::InvalidKeyLength {
                expected: SALT_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; SALT_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt(redacted)")
    }
}

/// A salted password hash, ready to persist.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: Salt,
    digest: [u8; 32],
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash(redacted)")
    }
}

impl PasswordHash {
    /// Hash `password` under a freshly generated salt.
    #[must_use]
    pub fn new(password: &str) -> Self {
        Self::with_salt(password, Salt::generate())
    }

    /// Hash `password` under a specific salt (used when verifying).
    #[must_use]
    pub fn with_salt(password: &str, salt: Salt) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(salt.0);
        let digest: [u8; 32] = hasher.finalize().into();
        Self { salt, digest }
    }

    /// The salt this hash was computed with.
    #[must_use]
    pub const fn salt(&self) -> Salt {
        self.salt
    }

    /// Verify a candidate password against this stored hash in constant time.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate_hash = Self::with_salt(candidate, self.salt);
        constant_time_eq(&self.digest, &candidate_hash.digest)
    }

    /// Serialize as `salt_hex:digest_hex` for storage in the control plane.
    #[must_use]
    pub fn to_stored(&self) -> String {
        format!("{}:{}", self.salt.to_hex(), hex::encode(self.digest))
    }

    /// Parse a stored `salt_hex:digest_hex` string back into a `PasswordHash`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is malformed.
    pub fn from_stored(stored: &str) -> Result<Self, crate::CryptoError> {
        let (salt_hex, digest_hex) = stored
            .split_once(':')
            .ok_or_else(|| crate::CryptoError::InvalidHexEncoding)?;
        let salt = Salt::from_hex(salt_hex)?;
        let digest_bytes =
            hex::decode(digest_hex).map_err(|_| crate::CryptoError::InvalidHexEncoding)?;
        if digest_bytes.len() != 32 {
            return Err(crate::CryptoError::InvalidKeyLength {
                expected: 32,
                actual: digest_bytes.len(),
            });
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&digest_bytes);
        Ok(Self { salt, digest })
    }
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_correct_password() {
        let hash = PasswordHash::new("correct horse battery staple");
        assert!(hash.verify("correct horse battery staple"));
    }

    #[test]
    fn rejects_wrong_password() {
        let hash = PasswordHash::new("correct horse battery staple");
        assert!(!hash.verify("wrong password"));
    }

    #[test]
    fn roundtrips_through_storage_encoding() {
        let hash = PasswordHash::new("hunter2");
        let stored = hash.to_stored();
        let parsed = PasswordHash::from_stored(&stored).unwrap();
        assert!(parsed.verify("hunter2"));
        assert!(!parsed.verify("hunter3"));
    }

    #[test]
    fn same_password_different_salts_differ() {
        let a = PasswordHash::new("hunter2");
        let b = PasswordHash::new("hunter2");
        assert_ne!(a.to_stored(), b.to_stored());
    }
}
