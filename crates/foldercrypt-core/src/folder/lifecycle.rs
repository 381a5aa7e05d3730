//! Folder lifecycle: create, open, close
//!
//! A folder is in exactly one of two states, discriminated solely by the
//! existence of its shadow directory `<root>_decrypt`:
//!
//! - **Encrypted** (rest state): the root holds encrypted entries, no shadow.
//! - **Decrypted**: the shadow holds a cleartext mirror; the root itself is
//!   untouched and still encrypted.
//!
//! `create` turns a plain directory into the encrypted rest state in place.
//! `open` materializes the shadow without mutating the root, so any failure
//! there is recoverable by retrying. `close` is the dangerous one: it empties
//! the root *before* re-encrypting the shadow into it, and nothing rolls that
//! back - a mid-walk failure or process kill during `close` can lose data.
//! That ordering is part of the on-disk contract and is documented rather
//! than hardened.
//!
//! There is no lock file; two processes operating on the same root
//! concurrently can corrupt it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::crypto::content::encrypt_content;
use crate::crypto::kdf::{FolderKey, KeyDerivationError};
use crate::crypto::name::encrypt_name;
use crate::folder::password::{PasswordValidationError, PasswordValidator};
use crate::folder::transform::{transform_tree, Direction, TransformError};

/// Suffix appended to the root path to form the shadow directory.
pub const SHADOW_SUFFIX: &str = "_decrypt";

/// Errors produced by folder lifecycle operations.
#[derive(Error, Debug)]
pub enum FolderError {
    /// The encrypted root does not exist (`open`).
    #[error("encrypted folder {0} does not exist")]
    MissingRoot(PathBuf),

    /// The shadow directory already exists (`open`).
    #[error("folder is already open at {0}; close it before opening it again")]
    AlreadyOpen(PathBuf),

    /// No shadow directory exists (`close`).
    #[error("no decrypted folder at {0}; nothing to close")]
    NotOpen(PathBuf),

    /// Password validation failed.
    #[error(transparent)]
    Password(#[from] PasswordValidationError),

    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    Kdf(#[from] KeyDerivationError),

    /// A tree transform failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Filesystem I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FolderError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FolderError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Handle for the lifecycle operations on one folder root.
#[derive(Debug, Clone)]
pub struct Folder {
    root: PathBuf,
}

impl Folder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The shadow directory path: the root path with [`SHADOW_SUFFIX`]
    /// appended, always a sibling of the root.
    pub fn shadow_path(&self) -> PathBuf {
        let mut shadow = self.root.as_os_str().to_os_string();
        shadow.push(SHADOW_SUFFIX);
        PathBuf::from(shadow)
    }

    /// Whether the folder is currently open (its shadow exists).
    pub fn is_open(&self) -> bool {
        self.shadow_path().exists()
    }

    /// Encrypt the folder in place, making it the encrypted rest state.
    ///
    /// The root is created (empty) if absent. Every entry in the tree is
    /// consumed: files are rewritten as encrypted blobs under their encrypted
    /// names and the originals deleted; directories are renamed after their
    /// contents are processed.
    ///
    /// There is no state pre-check: running `create` on an already-encrypted
    /// tree double-encrypts it.
    #[instrument(level = "info", skip(self, password), fields(root = %self.root.display()))]
    pub fn create(&self, password: &str) -> Result<(), FolderError> {
        fs::create_dir_all(&self.root).map_err(|e| FolderError::io(&self.root, e))?;
        let key = FolderKey::derive(password)?;
        encrypt_in_place(&self.root, &key)?;
        debug!("folder encrypted in place");
        Ok(())
    }

    /// Decrypt the folder into its shadow directory and return the shadow
    /// path.
    ///
    /// The encrypted root is never mutated by this operation. If the
    /// transform fails partway, the partially-written shadow is removed
    /// best-effort and the original error is returned; retrying is always
    /// safe.
    #[instrument(level = "info", skip(self, password), fields(root = %self.root.display()))]
    pub fn open(&self, password: &str) -> Result<PathBuf, FolderError> {
        if !self.root.is_dir() {
            return Err(FolderError::MissingRoot(self.root.clone()));
        }
        let shadow = self.shadow_path();
        if shadow.exists() {
            return Err(FolderError::AlreadyOpen(shadow));
        }

        let key = PasswordValidator::new(&self.root).validate(password)?;

        fs::create_dir_all(&shadow).map_err(|e| FolderError::io(&shadow, e))?;
        if let Err(e) = transform_tree(&self.root, &shadow, &key, Direction::Decrypt) {
            // Best-effort cleanup; the transform error is what the caller
            // needs to see.
            if let Err(cleanup) = fs::remove_dir_all(&shadow) {
                warn!(
                    shadow = %shadow.display(),
                    error = %cleanup,
                    "failed to remove partially decrypted shadow"
                );
            }
            return Err(e.into());
        }

        debug!(shadow = %shadow.display(), "folder decrypted into shadow");
        Ok(shadow)
    }

    /// Re-encrypt the shadow back into the root and delete the shadow.
    ///
    /// The password is validated against the still-encrypted root before
    /// anything is touched. After validation the root is emptied - the point
    /// of no return. A failure between emptying the root and finishing the
    /// re-encryption leaves a partially-written root and an intact shadow;
    /// this design provides no rollback for that window.
    #[instrument(level = "info", skip(self, password), fields(root = %self.root.display()))]
    pub fn close(&self, password: &str) -> Result<(), FolderError> {
        let shadow = self.shadow_path();
        if !shadow.is_dir() {
            return Err(FolderError::NotOpen(shadow));
        }

        let key = PasswordValidator::new(&self.root).validate(password)?;

        // Point of no return.
        empty_dir(&self.root).map_err(|e| FolderError::io(&self.root, e))?;
        transform_tree(&shadow, &self.root, &key, Direction::Encrypt)?;
        fs::remove_dir_all(&shadow).map_err(|e| FolderError::io(&shadow, e))?;

        debug!("shadow re-encrypted into root and removed");
        Ok(())
    }
}

/// Depth-first in-place encryption for `create`.
///
/// Entries are snapshotted before any renaming: mutating a directory while a
/// `read_dir` cursor is live is platform-dependent.
fn encrypt_in_place(dir: &Path, key: &FolderKey) -> Result<(), TransformError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| TransformError::io(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TransformError::io(dir, e))?;

    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            return Err(TransformError::NonUnicodeName { path });
        };
        let target = dir.join(encrypt_name(name, key));

        let file_type = entry.file_type().map_err(|e| TransformError::io(&path, e))?;
        if file_type.is_dir() {
            encrypt_in_place(&path, key)?;
            fs::rename(&path, &target).map_err(|e| TransformError::io(&path, e))?;
        } else {
            let plaintext = fs::read(&path).map_err(|e| TransformError::io(&path, e))?;
            fs::write(&target, encrypt_content(&plaintext, key))
                .map_err(|e| TransformError::io(&target, e))?;
            if target != path {
                fs::remove_file(&path).map_err(|e| TransformError::io(&path, e))?;
            }
        }
    }
    Ok(())
}

/// Remove every entry of `dir`, keeping `dir` itself (and its permissions).
fn empty_dir(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
