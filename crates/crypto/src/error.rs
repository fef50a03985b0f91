use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid key: expected 16 or 32 bytes, got {len}")]
    InvalidKey { len: usize },

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Tag did not verify. Deliberately carries no detail.
    #[error("authentication failed: wrong key or corrupted data")]
    AuthenticationFailure,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("link has no secret id")]
    MissingId,

    #[error("link has no decryption key")]
    MissingKey,

    #[error("invalid secret id: {0:?}")]
    InvalidId(String),
}
