//! Error types for the foldercrypt engine
//!
//! This module re-exports the error types defined next to the code that
//! produces them, so callers can match on everything from one place.

pub use crate::crypto::kdf::KeyDerivationError;
pub use crate::crypto::DecryptionError;
pub use crate::folder::lifecycle::FolderError;
pub use crate::folder::password::PasswordValidationError;
pub use crate::folder::transform::TransformError;
