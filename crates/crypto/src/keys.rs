use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::envelope::EnvelopeVersion;
use crate::{base58, CryptoError, KEY_SIZE_V1, KEY_SIZE_V2};

/// Raw AES key material, 16 bytes (legacy links) or 32 bytes (current).
///
/// Only ever leaves the process as base58 inside a URL fragment. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: Vec<u8>,
}

impl SymmetricKey {
    /// Generate a fresh 256-bit key. 128-bit keys are never generated.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; KEY_SIZE_V2];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            KEY_SIZE_V1 | KEY_SIZE_V2 => Ok(Self {
                bytes: bytes.to_vec(),
            }),
            len => Err(CryptoError::InvalidKey { len }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Envelope version this key seals under.
    pub fn version(&self) -> EnvelopeVersion {
        if self.bytes.len() == KEY_SIZE_V1 {
            EnvelopeVersion::V1
        } else {
            EnvelopeVersion::V2
        }
    }

    /// Base58 form, as carried in share links.
    pub fn encode(&self) -> String {
        base58::encode(&self.bytes)
    }

    pub fn decode(encoded: &str) -> Result<Self, CryptoError> {
        let mut bytes = base58::decode(encoded)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }
}

impl FromStr for SymmetricKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

pub fn generate_key() -> SymmetricKey {
    SymmetricKey::generate()
}

pub fn encode_key(key: &SymmetricKey) -> String {
    key.encode()
}

pub fn decode_key(encoded: &str) -> Result<SymmetricKey, CryptoError> {
    SymmetricKey::decode(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_32_bytes() {
        let key = generate_key();
        assert_eq!(key.len(), KEY_SIZE_V2);
        assert_eq!(key.version(), EnvelopeVersion::V2);
    }

    #[test]
    fn test_generate_unique() {
        assert_ne!(SymmetricKey::generate(), SymmetricKey::generate());
    }

    #[test]
    fn test_encode_decode() {
        let key = SymmetricKey::generate();
        let encoded = encode_key(&key);
        assert!(base58::is_valid_key(&encoded));
        assert_eq!(decode_key(&encoded).unwrap(), key);
    }

    #[test]
    fn test_legacy_key_accepted() {
        let key = SymmetricKey::from_bytes(&[3u8; 16]).unwrap();
        assert_eq!(key.version(), EnvelopeVersion::V1);
        let parsed: SymmetricKey = key.encode().parse().unwrap();
        assert_eq!(parsed.as_bytes(), &[3u8; 16]);
    }

    #[test]
    fn test_wrong_length() {
        let err = decode_key(&base58::encode(&[1u8; 20])).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey { len: 20 }));
        assert!(matches!(
            SymmetricKey::from_bytes(&[]),
            Err(CryptoError::InvalidKey { len: 0 })
        ));
    }

    #[test]
    fn test_bad_characters() {
        let err = decode_key("not-base58!").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidEncoding(_)));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = SymmetricKey::from_bytes(&[0xAB; 32]).unwrap();
        let shown = format!("{key:?}");
        assert!(shown.contains("len: 32"), "{shown}");
        assert!(!shown.contains("171"), "{shown}");
        assert!(!shown.contains(&key.encode()), "{shown}");
    }
}
