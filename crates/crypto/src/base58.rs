//! Base58 with the Bitcoin alphabet.
//!
//! The input is treated as one big-endian integer of arbitrary length, so the
//! conversion runs over a little-endian digit vector instead of a machine word.
//! Leading zero bytes map one-to-one onto leading `'1'` characters.

use crate::{CryptoError, KEY_SIZE_V1, KEY_SIZE_V2};

pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const INVALID: u8 = 0xff;

const DECODE_MAP: [u8; 128] = build_decode_map();

const fn build_decode_map() -> [u8; 128] {
    let mut map = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        map[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    map
}

fn digit_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match DECODE_MAP[c as usize] {
        INVALID => None,
        v => Some(v),
    }
}

/// Encode bytes as a base58 string. Empty input encodes to the empty string.
pub fn encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();

    // log(256) / log(58) ~= 1.37
    let mut digits: Vec<u8> = Vec::with_capacity((bytes.len() - zeros) * 138 / 100 + 1);
    for &byte in &bytes[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decode a base58 string.
///
/// Fails with [`CryptoError::InvalidEncoding`] on the first character outside
/// the alphabet (including `0`, `O`, `I`, `l` and any non-ASCII character).
pub fn decode(input: &str) -> Result<Vec<u8>, CryptoError> {
    let ones = input.bytes().take_while(|&c| c == b'1').count();

    // log(58) / log(256) ~= 0.733
    let mut bytes: Vec<u8> = Vec::with_capacity((input.len() - ones) * 733 / 1000 + 1);
    for (pos, c) in input.char_indices().skip(ones) {
        let value = digit_value(c).ok_or_else(|| {
            CryptoError::InvalidEncoding(format!(
                "invalid base58 character {c:?} at position {pos}"
            ))
        })?;

        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; ones];
    out.extend(bytes.iter().rev());
    Ok(out)
}

/// Pre-flight check for a key string: alphabet-only and decoding to exactly
/// 16 or 32 bytes.
pub fn is_valid_key(key: &str) -> bool {
    if key.is_empty() || !key.chars().all(|c| digit_value(c).is_some()) {
        return false;
    }
    matches!(decode(key), Ok(bytes) if bytes.len() == KEY_SIZE_V1 || bytes.len() == KEY_SIZE_V2)
}
