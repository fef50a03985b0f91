//! Envelope wire format.
//!
//! ```text
//! versioned: [version:1][nonce:12][ciphertext || tag:16]    version ∈ {1, 2}
//! legacy:    [nonce:12][ciphertext || tag:16]
//! ```
//!
//! The first byte is the only discriminator. A legacy envelope whose nonce
//! happens to start with 0x01 or 0x02 is read as versioned and will fail to
//! authenticate; links issued in that shape depend on this exact rule, so it
//! is kept as is.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes128Gcm, Aes256Gcm, Nonce,
};

use crate::{CryptoError, SymmetricKey, KEY_SIZE_V1, KEY_SIZE_V2, NONCE_SIZE, TAG_SIZE};

pub const VERSION_V1: u8 = 1;
pub const VERSION_V2: u8 = 2;

/// Smallest valid versioned envelope: version byte, nonce and a bare tag.
pub const MIN_VERSIONED_LEN: usize = 1 + NONCE_SIZE + TAG_SIZE;
pub const MIN_LEGACY_LEN: usize = NONCE_SIZE + TAG_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EnvelopeVersion {
    /// AES-128-GCM, 16-byte key. Read-only.
    V1 = VERSION_V1,
    /// AES-256-GCM, 32-byte key.
    V2 = VERSION_V2,
}

impl EnvelopeVersion {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            VERSION_V1 => Some(Self::V1),
            VERSION_V2 => Some(Self::V2),
            _ => None,
        }
    }

    pub fn for_key_len(len: usize) -> Option<Self> {
        match len {
            KEY_SIZE_V1 => Some(Self::V1),
            KEY_SIZE_V2 => Some(Self::V2),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn key_len(self) -> usize {
        match self {
            Self::V1 => KEY_SIZE_V1,
            Self::V2 => KEY_SIZE_V2,
        }
    }
}

/// Borrowed view of an envelope after shape detection.
#[derive(Debug)]
pub struct ParsedEnvelope<'a> {
    /// `None` for the legacy, pre-versioning shape.
    pub version: Option<EnvelopeVersion>,
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext with the authentication tag appended.
    pub ciphertext: &'a [u8],
}

impl ParsedEnvelope<'_> {
    pub fn is_legacy(&self) -> bool {
        self.version.is_none()
    }
}

/// Split an envelope into version, nonce and ciphertext without decrypting.
pub fn parse(data: &[u8]) -> Result<ParsedEnvelope<'_>, CryptoError> {
    let first = *data
        .first()
        .ok_or_else(|| CryptoError::MalformedEnvelope("envelope is empty".into()))?;

    let (version, body, min_len) = match EnvelopeVersion::from_byte(first) {
        Some(version) => (Some(version), &data[1..], MIN_VERSIONED_LEN),
        None => (None, data, MIN_LEGACY_LEN),
    };

    if data.len() < min_len {
        return Err(CryptoError::MalformedEnvelope(format!(
            "envelope too short: {} bytes, need at least {min_len}",
            data.len()
        )));
    }

    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&body[..NONCE_SIZE]);

    Ok(ParsedEnvelope {
        version,
        nonce,
        ciphertext: &body[NONCE_SIZE..],
    })
}

/// AES-GCM keyed by length: 16 bytes selects AES-128, 32 bytes AES-256.
/// Both variants use a 96-bit nonce and a 128-bit tag.
pub(crate) enum Cipher {
    Aes128(Box<Aes128Gcm>),
    Aes256(Box<Aes256Gcm>),
}

impl Cipher {
    pub(crate) fn new(key: &SymmetricKey) -> Result<Self, CryptoError> {
        let bytes = key.as_bytes();
        let cipher = match bytes.len() {
            KEY_SIZE_V1 => Aes128Gcm::new_from_slice(bytes).map(|c| Self::Aes128(Box::new(c))),
            _ => Aes256Gcm::new_from_slice(bytes).map(|c| Self::Aes256(Box::new(c))),
        };
        cipher.map_err(|_| CryptoError::InvalidKey { len: bytes.len() })
    }

    pub(crate) fn encrypt(
        &self,
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = Nonce::from_slice(nonce);
        let result = match self {
            Self::Aes128(cipher) => cipher.encrypt(nonce, plaintext),
            Self::Aes256(cipher) => cipher.encrypt(nonce, plaintext),
        };
        result.map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    /// All-or-nothing: no plaintext is returned unless the tag verifies.
    pub(crate) fn decrypt(
        &self,
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = Nonce::from_slice(nonce);
        let result = match self {
            Self::Aes128(cipher) => cipher.decrypt(nonce, ciphertext),
            Self::Aes256(cipher) => cipher.decrypt(nonce, ciphertext),
        };
        result.map_err(|_| CryptoError::AuthenticationFailure)
    }
}
