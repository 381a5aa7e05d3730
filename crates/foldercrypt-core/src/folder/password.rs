//! Password validation against an encrypted folder
//!
//! Validation never decrypts real file content. It derives the key, picks the
//! first directory entry the filesystem lists, and tries to decrypt that
//! entry's *name*. A decryption that succeeds and contains no NUL byte is
//! taken as evidence the password is right. This is a best-effort gate, not a
//! proof: a password can pass here and still fail on actual file content.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::crypto::kdf::{FolderKey, KeyDerivationError};
use crate::crypto::name::decrypt_name;

/// Errors that can occur during password validation.
#[derive(Error, Debug)]
pub enum PasswordValidationError {
    /// The password was incorrect.
    ///
    /// Deliberately covers every heuristic failure - rejected padding,
    /// garbage plaintext, a NUL byte in the decrypted name - so the caller
    /// cannot distinguish *how* a wrong password failed.
    #[error("Incorrect password")]
    IncorrectPassword,

    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    Kdf(#[from] KeyDerivationError),

    /// Filesystem I/O error while listing the folder.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Validates a password against an encrypted folder root.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    root: PathBuf,
}

impl PasswordValidator {
    /// Create a validator for the folder at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Validate `password` and return the derived key on success.
    ///
    /// Returning the key means scrypt runs exactly once per operation; the
    /// caller passes the key on instead of re-deriving it.
    ///
    /// An empty folder accepts any password unconditionally - there is
    /// nothing to validate against, and the first write will bind the folder
    /// to whatever key that password derives.
    pub fn validate(&self, password: &str) -> Result<FolderKey, PasswordValidationError> {
        let key = FolderKey::derive(password)?;

        let Some(entry) = fs::read_dir(&self.root)?.next() else {
            debug!(root = %self.root.display(), "folder is empty, accepting password unchecked");
            return Ok(key);
        };
        let entry = entry?;

        // Encrypted names are always ASCII hex; a non-Unicode name cannot be
        // one, which the uniform policy below reports as a wrong password.
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            return Err(PasswordValidationError::IncorrectPassword);
        };

        match decrypt_name(name, &key) {
            Ok(clear) if !clear.contains('\0') => Ok(key),
            Ok(_) | Err(_) => {
                debug!(root = %self.root.display(), "probe entry failed the password heuristic");
                Err(PasswordValidationError::IncorrectPassword)
            }
        }
    }
}
