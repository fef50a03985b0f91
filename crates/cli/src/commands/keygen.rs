use anyhow::{bail, Result};
use snaplink_crypto::{base58, SymmetricKey};

pub fn run() {
    println!("{}", SymmetricKey::generate().encode());
}

pub fn check(key: &str) -> Result<()> {
    let bits = describe(key)?;
    println!("valid {bits}-bit key");
    Ok(())
}

fn describe(key: &str) -> Result<usize> {
    if !base58::is_valid_key(key) {
        bail!("not a valid key: expected base58 encoding of 16 or 32 bytes");
    }
    Ok(base58::decode(key)?.len() * 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let key = SymmetricKey::generate().encode();
        assert_eq!(describe(&key).unwrap(), 256);

        let short = base58::encode(&[7u8; 16]);
        assert_eq!(describe(&short).unwrap(), 128);

        assert!(describe("0OIl").is_err());
        assert!(describe(&base58::encode(&[1u8; 24])).is_err());
    }
}
