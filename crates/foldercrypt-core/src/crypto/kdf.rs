//! Password-based key derivation
//!
//! A [`FolderKey`] is derived once per operation with scrypt and a constant,
//! build-time salt. The salt is deliberately not per-folder: encrypted names
//! must be reproducible from the password alone, with no metadata file to
//! store a salt in. The cost of that property is that identical passwords
//! yield identical keys across every deployment of the same build - a known
//! limitation, kept for compatibility with existing encrypted folders.

use std::fmt;

use scrypt::{scrypt, Params};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Constant scrypt salt shared by every folder.
const KDF_SALT: &[u8] = b"salt";

// scrypt cost parameters: N = 2^14, r = 8, p = 1. These match the defaults
// the original deployments derived their keys with; changing them would make
// existing folders unreadable.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Errors that can occur during key derivation.
#[derive(Error, Debug)]
pub enum KeyDerivationError {
    /// The scrypt cost parameters were rejected.
    #[error("invalid scrypt parameters: {0}")]
    Params(#[from] scrypt::errors::InvalidParams),

    /// The requested output length was rejected by scrypt.
    #[error("invalid scrypt output length: {0}")]
    OutputLen(#[from] scrypt::errors::InvalidOutputLen),
}

/// A password-derived symmetric key.
///
/// Owned by exactly one create/open/close operation, never persisted, and
/// zeroized when dropped at the end of that operation. `Debug` is redacted so
/// key material cannot leak through logs.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FolderKey {
    bytes: [u8; KEY_LEN],
}

impl FolderKey {
    /// Derive the key for `password`.
    ///
    /// Deterministic: the same password always yields the same key. This is
    /// CPU-bound and takes a perceptible fraction of a second by design.
    pub fn derive(password: &str) -> Result<Self, KeyDerivationError> {
        let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)?;
        let mut bytes = [0u8; KEY_LEN];
        scrypt(password.as_bytes(), KDF_SALT, &params, &mut bytes)?;
        Ok(Self { bytes })
    }

    /// Raw key bytes, for handing to the cipher.
    pub(crate) fn bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for FolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FolderKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = FolderKey::derive("hunter2").unwrap();
        let b = FolderKey::derive("hunter2").unwrap();
        assert_eq!(a.bytes(), b.bytes());
    }

    #[test]
    fn different_passwords_yield_different_keys() {
        let a = FolderKey::derive("hunter2").unwrap();
        let b = FolderKey::derive("hunter3").unwrap();
        assert_ne!(a.bytes(), b.bytes());
    }

    #[test]
    fn debug_is_redacted() {
        let key = FolderKey::derive("hunter2").unwrap();
        assert_eq!(format!("{key:?}"), "FolderKey(..)");
    }
}
