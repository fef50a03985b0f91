//! snaplink-crypto: client-side envelope for one-time secret links.
//!
//! Pipeline: random key → AES-GCM seal into a versioned envelope → base64 for
//! the storage API → key in base58 inside the link fragment.

pub mod base58;
pub mod decrypt;
pub mod encrypt;
pub mod envelope;
pub mod file;
pub mod keys;
pub mod link;
pub mod transfer;

mod error;
pub use error::{CryptoError, LinkError};

pub use decrypt::open;
pub use encrypt::seal;
pub use envelope::{EnvelopeVersion, VERSION_V1, VERSION_V2};
pub use file::{open_file, seal_file, FileMetadata};
pub use keys::SymmetricKey;
pub use link::{build_link, parse_link, LinkStyle, ShareLink};

/// Key size for version 1 envelopes (AES-128). Decrypt only.
pub const KEY_SIZE_V1: usize = 16;
/// Key size for version 2 envelopes (AES-256).
pub const KEY_SIZE_V2: usize = 32;

/// AES-GCM nonce size (96-bit)
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size
pub const TAG_SIZE: usize = 16;
