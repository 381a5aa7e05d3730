//! Recursive tree transformation
//!
//! Mirrors a source tree into a target tree, transforming every entry name
//! and every file's bytes in one direction. The walk is depth-first,
//! sequential, and skips nothing; directory listing order decides the order
//! within a level. The transform is not idempotent - running it twice in the
//! same direction double-encrypts or double-decrypts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{instrument, trace};

use crate::crypto::content::{decrypt_content, encrypt_content};
use crate::crypto::kdf::FolderKey;
use crate::crypto::name::{decrypt_name, encrypt_name};
use crate::crypto::DecryptionError;

/// Which way a pass transforms names and content.
///
/// Names and content always move in the same direction within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Errors produced while transforming a tree. Each carries the path of the
/// entry that failed.
#[derive(Error, Debug)]
pub enum TransformError {
    /// An entry name could not be transformed.
    #[error("failed to transform the name of {path}: {source}")]
    Name {
        path: PathBuf,
        #[source]
        source: DecryptionError,
    },

    /// A file's contents could not be decrypted.
    #[error("failed to decrypt {path}: {source}")]
    Content {
        path: PathBuf,
        #[source]
        source: DecryptionError,
    },

    /// An entry name was not valid Unicode. The name cipher is defined over
    /// UTF-8, so such an entry cannot be part of an encrypted folder.
    #[error("entry name at {path} is not valid Unicode")]
    NonUnicodeName { path: PathBuf },

    /// Filesystem I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransformError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TransformError::Io {
            path: path.into(),
            source,
        }
    }
}

pub(crate) fn transform_name(
    name: &str,
    key: &FolderKey,
    direction: Direction,
) -> Result<String, DecryptionError> {
    match direction {
        Direction::Encrypt => Ok(encrypt_name(name, key)),
        Direction::Decrypt => decrypt_name(name, key),
    }
}

/// Recursively mirror `source` into `target`, transforming names and file
/// contents in `direction`.
///
/// `target` must already exist. Files are read whole, transformed, and
/// written under their transformed name; directories are created under their
/// transformed name and recursed into. Entries at one level never collide
/// after renaming because the name cipher is injective for a fixed key.
#[instrument(level = "debug", skip(key))]
pub fn transform_tree(
    source: &Path,
    target: &Path,
    key: &FolderKey,
    direction: Direction,
) -> Result<(), TransformError> {
    let entries = fs::read_dir(source).map_err(|e| TransformError::io(source, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| TransformError::io(source, e))?;
        let path = entry.path();

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            return Err(TransformError::NonUnicodeName { path });
        };
        let mapped = transform_name(name, key, direction).map_err(|source| TransformError::Name {
            path: path.clone(),
            source,
        })?;
        let target_path = target.join(mapped);

        let file_type = entry.file_type().map_err(|e| TransformError::io(&path, e))?;
        if file_type.is_dir() {
            trace!(path = %path.display(), "descending into directory");
            fs::create_dir(&target_path).map_err(|e| TransformError::io(&target_path, e))?;
            transform_tree(&path, &target_path, key, direction)?;
        } else {
            trace!(path = %path.display(), "transforming file");
            let bytes = fs::read(&path).map_err(|e| TransformError::io(&path, e))?;
            let output = match direction {
                Direction::Encrypt => encrypt_content(&bytes, key),
                Direction::Decrypt => {
                    decrypt_content(&bytes, key).map_err(|source| TransformError::Content {
                        path: path.clone(),
                        source,
                    })?
                }
            };
            fs::write(&target_path, output).map_err(|e| TransformError::io(&target_path, e))?;
        }
    }
    Ok(())
}
