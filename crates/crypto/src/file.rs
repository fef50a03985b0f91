use serde::{Deserialize, Serialize};

use crate::decrypt::open;
use crate::encrypt::seal;
use crate::envelope::parse;
use crate::{transfer, CryptoError, SymmetricKey};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Sidecar for shared files, stored in the clear next to the envelope.
///
/// `iv` duplicates the nonce embedded in the envelope (base64). The envelope
/// copy is authoritative; a differing `iv` is rejected rather than used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub original_filename: String,
    pub content_type: String,
    #[serde(default)]
    pub iv: String,
}

/// Seal file contents and describe them. Returns the metadata and the envelope.
pub fn seal_file(
    contents: &[u8],
    original_filename: &str,
    content_type: &str,
    key: &SymmetricKey,
) -> Result<(FileMetadata, Vec<u8>), CryptoError> {
    let envelope = seal(contents, key)?;
    let nonce = parse(&envelope)?.nonce;

    let content_type = if content_type.trim().is_empty() {
        DEFAULT_CONTENT_TYPE
    } else {
        content_type
    };

    let metadata = FileMetadata {
        original_filename: original_filename.to_string(),
        content_type: content_type.to_string(),
        iv: transfer::to_text(&nonce),
    };
    Ok((metadata, envelope))
}

/// Open a file envelope after checking its metadata agrees on the nonce.
pub fn open_file(
    metadata: &FileMetadata,
    envelope: &[u8],
    key: &SymmetricKey,
) -> Result<Vec<u8>, CryptoError> {
    if !metadata.iv.is_empty() {
        let embedded = parse(envelope)?.nonce;
        let declared = transfer::from_text(&metadata.iv)?;
        if declared != embedded {
            return Err(CryptoError::MalformedEnvelope(
                "metadata iv does not match the envelope nonce".into(),
            ));
        }
    }
    open(envelope, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NONCE_SIZE;

    #[test]
    fn test_file_roundtrip() {
        let key = SymmetricKey::generate();
        let contents = b"%PDF-1.7 not really a pdf";
        let (metadata, envelope) =
            seal_file(contents, "report.pdf", "application/pdf", &key).unwrap();

        assert_eq!(metadata.original_filename, "report.pdf");
        assert_eq!(metadata.content_type, "application/pdf");
        assert_eq!(
            transfer::from_text(&metadata.iv).unwrap(),
            envelope[1..1 + NONCE_SIZE]
        );
        assert_eq!(open_file(&metadata, &envelope, &key).unwrap(), contents);
    }

    #[test]
    fn test_mismatched_iv_rejected() {
        let key = SymmetricKey::generate();
        let (mut metadata, envelope) = seal_file(b"data", "a.txt", "text/plain", &key).unwrap();
        metadata.iv = transfer::to_text(&[0u8; NONCE_SIZE]);
        assert!(matches!(
            open_file(&metadata, &envelope, &key),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_missing_iv_uses_envelope() {
        let key = SymmetricKey::generate();
        let (mut metadata, envelope) = seal_file(b"data", "a.txt", "text/plain", &key).unwrap();
        metadata.iv.clear();
        assert_eq!(open_file(&metadata, &envelope, &key).unwrap(), b"data");
    }

    #[test]
    fn test_empty_content_type_defaults() {
        let key = SymmetricKey::generate();
        let (metadata, _) = seal_file(b"x", "blob", "", &key).unwrap();
        assert_eq!(metadata.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_metadata_wire_names() {
        let metadata = FileMetadata {
            original_filename: "a.txt".into(),
            content_type: "text/plain".into(),
            iv: "AAAA".into(),
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["originalFilename"], "a.txt");
        assert_eq!(json["contentType"], "text/plain");
        assert_eq!(json["iv"], "AAAA");
    }
}
