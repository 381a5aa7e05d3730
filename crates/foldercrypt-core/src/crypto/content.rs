//! File content encryption
//!
//! On-disk layout of an encrypted file: `IV (16 bytes, random per file) ||
//! ciphertext`. The IV is fresh for every encryption, so encrypting the same
//! bytes twice produces different blobs that decrypt to the same plaintext.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use super::{Aes256CbcDec, Aes256CbcEnc, DecryptionError, BLOCK_LEN};
use crate::crypto::kdf::FolderKey;

/// IV length in bytes, always exactly the cipher block size.
pub const IV_LEN: usize = BLOCK_LEN;

/// Encrypt `plaintext` under `key`, returning `IV || ciphertext`.
///
/// The ciphertext length is always a positive multiple of [`BLOCK_LEN`]
/// (PKCS#7 pads even an empty plaintext to one full block).
pub fn encrypt_content(plaintext: &[u8], key: &FolderKey) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);

    let ciphertext =
        Aes256CbcEnc::new(key.bytes().into(), (&iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    blob
}

/// Decrypt an `IV || ciphertext` blob produced by [`encrypt_content`].
///
/// Fails if the blob is shorter than `IV + one block`, if the ciphertext is
/// not block-aligned, or if the padding does not validate. Padding validity
/// is the only wrong-key signal there is; a successful return is *not* an
/// integrity guarantee.
pub fn decrypt_content(blob: &[u8], key: &FolderKey) -> Result<Vec<u8>, DecryptionError> {
    if blob.len() < IV_LEN + BLOCK_LEN {
        return Err(DecryptionError::Truncated { len: blob.len() });
    }
    let (iv, ciphertext) = blob.split_at(IV_LEN);
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(DecryptionError::Misaligned {
            len: ciphertext.len(),
        });
    }

    let iv: &[u8; IV_LEN] = iv.try_into().expect("split_at yields an IV-sized prefix");
    Aes256CbcDec::new(key.bytes().into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| DecryptionError::Padding)
}
