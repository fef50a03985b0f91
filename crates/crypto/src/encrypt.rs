use rand::RngCore;

use crate::envelope::Cipher;
use crate::{CryptoError, SymmetricKey, NONCE_SIZE};

fn fresh_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Seal plaintext into a versioned envelope.
///
/// The version byte follows the key size (16 → 1, 32 → 2). A new random nonce
/// is drawn on every call; the output is `version || nonce || ciphertext || tag`.
pub fn seal(plaintext: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, CryptoError> {
    let nonce = fresh_nonce();
    let ciphertext = Cipher::new(key)?.encrypt(&nonce, plaintext)?;

    let mut output = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
    output.push(key.version().as_byte());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);

    Ok(output)
}

/// Seal into the pre-versioning layout, `nonce || ciphertext || tag`.
///
/// Only for producing compatibility fixtures. One nonce in 128 starts with
/// 0x01 or 0x02, and such an envelope is unreadable under the detection rule.
pub fn seal_legacy(plaintext: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, CryptoError> {
    let nonce = fresh_nonce();
    let ciphertext = Cipher::new(key)?.encrypt(&nonce, plaintext)?;

    let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);

    Ok(output)
}
