use crate::envelope::{parse, Cipher};
use crate::{CryptoError, SymmetricKey};

/// Open a versioned or legacy envelope.
///
/// Returns the plaintext only after the AES-GCM tag verifies. A wrong key,
/// a flipped bit or a cut-off buffer past the minimum length all surface as
/// [`CryptoError::AuthenticationFailure`].
pub fn open(envelope: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, CryptoError> {
    let parsed = parse(envelope)?;
    Cipher::new(key)?.decrypt(&parsed.nonce, parsed.ciphertext)
}
