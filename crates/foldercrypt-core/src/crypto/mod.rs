//! Cryptographic primitives for folder encryption
//!
//! All encryption in this crate is AES-256-CBC with PKCS#7 padding. There is
//! **no authentication tag**: padding validity on decryption is the only
//! signal that a key was wrong, and a corrupted ciphertext whose padding
//! happens to validate will decrypt to garbage without error. Callers must
//! not treat a successful decryption as proof of correctness; see
//! [`crate::folder::PasswordValidator`] for the heuristic built on top.

pub mod content;
pub mod kdf;
pub mod name;

use thiserror::Error;

/// AES block size in bytes. IVs and ciphertext lengths are multiples of this.
pub const BLOCK_LEN: usize = 16;

pub(crate) type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
pub(crate) type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Errors that can occur while decrypting file contents or names.
///
/// Every variant here is indistinguishable from a wrong key as far as the
/// cipher is concerned; only the caller's context (validating a password vs.
/// reading a file believed to be intact) gives it meaning.
#[derive(Error, Debug)]
pub enum DecryptionError {
    /// The input is shorter than a single cipher block.
    #[error("ciphertext is truncated: {len} bytes is shorter than one {BLOCK_LEN}-byte block")]
    Truncated { len: usize },

    /// The ciphertext length is not a multiple of the cipher block size.
    #[error("ciphertext length {len} is not a multiple of the {BLOCK_LEN}-byte block size")]
    Misaligned { len: usize },

    /// PKCS#7 padding did not validate after decryption.
    ///
    /// The usual cause is a wrong key; tampering and corruption produce the
    /// same failure.
    #[error("padding check failed - wrong password or corrupted data")]
    Padding,

    /// An encrypted name was not valid hexadecimal.
    #[error("encrypted name is not valid hex: {0}")]
    NameEncoding(#[from] hex::FromHexError),

    /// A decrypted name was not valid UTF-8.
    #[error("decrypted name is not valid UTF-8")]
    NameNotUtf8,
}

// Re-export commonly used items
pub use content::{decrypt_content, encrypt_content, IV_LEN};
pub use kdf::{FolderKey, KeyDerivationError, KEY_LEN};
pub use name::{decrypt_name, encrypt_name};
