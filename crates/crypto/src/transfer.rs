//! Text form of an envelope for JSON bodies: standard base64 with padding.
//!
//! Work is done in fixed-size chunks so very large envelopes never need one
//! oversized intermediate buffer. Chunk sizes sit on base64 quantum
//! boundaries, so the output is identical to a single-shot encode.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::CryptoError;

/// Input bytes per encode step. A multiple of 3, so only the final chunk can
/// produce padding.
pub const ENCODE_CHUNK: usize = 3 * 10_922;

/// Input characters per decode step. A multiple of 4.
pub const DECODE_CHUNK: usize = 32 * 1024;

pub fn to_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(ENCODE_CHUNK) {
        STANDARD.encode_string(chunk, &mut out);
    }
    out
}

pub fn from_text(text: &str) -> Result<Vec<u8>, CryptoError> {
    let mut out = Vec::with_capacity(text.len() / 4 * 3);
    let chunks = text.as_bytes().chunks(DECODE_CHUNK);
    let last = chunks.len().saturating_sub(1);
    for (index, chunk) in chunks.enumerate() {
        // Padding may only close the final chunk.
        if index < last && chunk.last() == Some(&b'=') {
            return Err(CryptoError::InvalidEncoding(format!(
                "base64 padding before end of input (offset {})",
                (index + 1) * DECODE_CHUNK - 1
            )));
        }
        STANDARD.decode_vec(chunk, &mut out).map_err(|e| {
            CryptoError::InvalidEncoding(format!(
                "base64 chunk {index} (offset {}): {e}",
                index * DECODE_CHUNK
            ))
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chunk_sizes_align() {
        assert_eq!(ENCODE_CHUNK % 3, 0);
        assert_eq!(DECODE_CHUNK % 4, 0);
        assert!(ENCODE_CHUNK <= 32 * 1024);
    }

    #[test]
    fn test_known_value() {
        assert_eq!(to_text(b"hello world"), "aGVsbG8gd29ybGQ=");
        assert_eq!(from_text("aGVsbG8gd29ybGQ=").unwrap(), b"hello world");
        assert_eq!(to_text(&[]), "");
        assert!(from_text("").unwrap().is_empty());
    }

    #[test]
    fn test_matches_single_shot_across_chunk_boundaries() {
        for len in [
            ENCODE_CHUNK - 1,
            ENCODE_CHUNK,
            ENCODE_CHUNK + 1,
            3 * ENCODE_CHUNK + 2,
            200_000,
        ] {
            let data: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();
            let text = to_text(&data);
            assert_eq!(text, STANDARD.encode(&data), "len {len}");
            assert_eq!(from_text(&text).unwrap(), data, "len {len}");
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        for bad in ["@@@@", "aGVsbG8", "aGVs=bG8", "aGVsbG8gd29ybGQ=\n"] {
            assert!(
                matches!(from_text(bad), Err(CryptoError::InvalidEncoding(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_padding_at_chunk_boundary_rejected() {
        let mut text = "A".repeat(DECODE_CHUNK - 4);
        text.push_str("QQ==");
        text.push_str("QUFB");
        assert!(STANDARD.decode(&text).is_err());
        assert!(matches!(
            from_text(&text),
            Err(CryptoError::InvalidEncoding(_))
        ));

        // the same quantum closing the whole input is fine
        text.truncate(DECODE_CHUNK);
        assert_eq!(from_text(&text).unwrap(), STANDARD.decode(&text).unwrap());
    }

    #[test]
    fn test_malformed_quantum_in_second_chunk_rejected() {
        let mut text = "A".repeat(DECODE_CHUNK);
        text.push_str("QU=B");
        assert!(STANDARD.decode(&text).is_err());
        assert!(from_text(&text).is_err());
    }

    #[test]
    fn test_rejects_url_safe_alphabet() {
        let text = to_text(&[0xfb, 0xff, 0xbf]);
        assert_eq!(text, "+/+/");
        assert!(from_text("-_-_").is_err());
    }

    proptest! {
        #[test]
        fn prop_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(from_text(&to_text(&bytes)).unwrap(), bytes);
        }
    }
}
