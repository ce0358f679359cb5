//! Keyed message authentication using HMAC-SHA256.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use monovault_common::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Authentication tag size in bytes.
pub const TAG_LENGTH: usize = 32;

/// Compute an HMAC-SHA256 tag over `data`.
///
/// # Errors
/// - Returns error if the MAC cannot be keyed
pub fn compute_tag(key: &[u8], data: &[u8]) -> Result<[u8; TAG_LENGTH]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::Crypto(format!("HMAC key setup failed: {}", e)))?;
    mac.update(data);

    let mut tag = [0u8; TAG_LENGTH];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Verify an HMAC-SHA256 tag over `data`.
///
/// # Security
/// - Comparison is constant-time to avoid leaking how many tag bytes
///   matched
pub fn verify_tag(key: &[u8], data: &[u8], tag: &[u8]) -> Result<bool> {
    let expected = compute_tag(key, data)?;
    Ok(expected.as_slice().ct_eq(tag).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_verify_roundtrip() {
        let key = [7u8; 32];
        let data = b"authenticated data";

        let tag = compute_tag(&key, data).unwrap();
        assert!(verify_tag(&key, data, &tag).unwrap());
    }

    #[test]
    fn test_tampered_data_rejected() {
        let key = [7u8; 32];
        let tag = compute_tag(&key, b"original").unwrap();

        assert!(!verify_tag(&key, b"tampered", &tag).unwrap());
    }

    #[test]
    fn test_tampered_tag_rejected() {
        let key = [7u8; 32];
        let data = b"data";
        let mut tag = compute_tag(&key, data).unwrap();
        tag[0] ^= 0x01;

        assert!(!verify_tag(&key, data, &tag).unwrap());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let tag = compute_tag(&[1u8; 32], b"data").unwrap();
        assert!(!verify_tag(&[2u8; 32], b"data", &tag).unwrap());
    }

    #[test]
    fn test_truncated_tag_rejected() {
        let key = [7u8; 32];
        let tag = compute_tag(&key, b"data").unwrap();

        assert!(!verify_tag(&key, b"data", &tag[..16]).unwrap());
    }
}
