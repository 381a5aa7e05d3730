//! Deterministic path-segment encryption
//!
//! Names are encrypted under a **constant all-zero IV** and encoded as
//! lowercase hex, so the transform is a pure function of `(name, key)`.
//! Determinism is what lets every directory entry be encrypted and decrypted
//! independently during a tree walk, with no manifest or side table - and it
//! is also why equal plaintext names produce equal encrypted names anywhere
//! in the tree, leaking name equality to anyone who can list the folder.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::{Aes256CbcDec, Aes256CbcEnc, DecryptionError, BLOCK_LEN};
use crate::crypto::kdf::FolderKey;

const NAME_IV: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

/// Encrypt a single path segment, returning lowercase hex.
pub fn encrypt_name(name: &str, key: &FolderKey) -> String {
    let ciphertext = Aes256CbcEnc::new(key.bytes().into(), (&NAME_IV).into())
        .encrypt_padded_vec_mut::<Pkcs7>(name.as_bytes());
    hex::encode(ciphertext)
}

/// Decrypt a hex-encoded path segment produced by [`encrypt_name`].
///
/// Fails if the input is not valid hex, if the decoded ciphertext is empty or
/// not block-aligned, if the padding does not validate, or if the plaintext
/// is not UTF-8.
pub fn decrypt_name(encoded: &str, key: &FolderKey) -> Result<String, DecryptionError> {
    let ciphertext = hex::decode(encoded)?;
    if ciphertext.is_empty() {
        return Err(DecryptionError::Truncated { len: 0 });
    }
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(DecryptionError::Misaligned {
            len: ciphertext.len(),
        });
    }

    let plaintext = Aes256CbcDec::new(key.bytes().into(), (&NAME_IV).into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| DecryptionError::Padding)?;
    String::from_utf8(plaintext).map_err(|_| DecryptionError::NameNotUtf8)
}
