//! Symmetric stream encryption using AES-256-CTR.
//!
//! CTR mode XORs a keystream over the data, so encryption and decryption
//! are the same operation and the ciphertext has the exact length of the
//! plaintext. CTR provides no authentication; callers that need tamper
//! detection pair it with a keyed tag from [`crate::mac`].

use aes::cipher::{KeyIvInit, StreamCipher};

use crate::keys::{Nonce, KEY_LENGTH};
use monovault_common::{Error, Result};

/// AES-256 in CTR mode with a big-endian 128-bit counter.
type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

fn check_key(key: &[u8]) -> Result<&[u8; KEY_LENGTH]> {
    key.try_into().map_err(|_| Error::InvalidKeyLength {
        expected: KEY_LENGTH,
        actual: key.len(),
    })
}

/// XOR the AES-CTR keystream for `(key, nonce)` over `data` in place.
fn apply_keystream(key: &[u8; KEY_LENGTH], nonce: &Nonce, data: &mut [u8]) {
    let mut cipher = Aes256Ctr::new(key.into(), nonce.as_bytes().into());
    cipher.apply_keystream(data);
}

/// Encrypt plaintext under a fresh random nonce.
///
/// # Postconditions
/// - Returns `(ciphertext, nonce)`; ciphertext length equals plaintext length
/// - The nonce is drawn fresh on every call and must be stored alongside
///   the ciphertext
///
/// # Errors
/// - Returns [`Error::InvalidKeyLength`] if `key` is not 32 bytes
/// - Returns [`Error::Entropy`] if nonce generation fails
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Nonce)> {
    let key = check_key(key)?;
    let nonce = Nonce::generate()?;

    let mut ciphertext = plaintext.to_vec();
    apply_keystream(key, &nonce, &mut ciphertext);
    Ok((ciphertext, nonce))
}

/// Decrypt ciphertext produced by [`encrypt`] with the matching nonce.
///
/// Decryption cannot fail for a wrong key: CTR simply produces garbage.
/// Detecting tampering or a wrong key is the caller's job.
///
/// # Errors
/// - Returns [`Error::InvalidKeyLength`] if `key` is not 32 bytes
pub fn decrypt(key: &[u8], nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let key = check_key(key)?;

    let mut plaintext = ciphertext.to_vec();
    apply_keystream(key, nonce, &mut plaintext);
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = [42u8; KEY_LENGTH];
        let plaintext = b"Hello, World!";

        let (ciphertext, nonce) = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &nonce, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_ciphertext_same_length_as_plaintext() {
        let key = [42u8; KEY_LENGTH];
        let plaintext = vec![0xABu8; 1234];

        let (ciphertext, _) = encrypt(&key, &plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len());
    }

    #[test]
    fn test_fresh_nonce_each_call() {
        let key = [42u8; KEY_LENGTH];

        let (ct1, nonce1) = encrypt(&key, b"same plaintext").unwrap();
        let (ct2, nonce2) = encrypt(&key, b"same plaintext").unwrap();

        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn test_wrong_key_produces_garbage() {
        let key1 = [1u8; KEY_LENGTH];
        let key2 = [2u8; KEY_LENGTH];

        let (ciphertext, nonce) = encrypt(&key1, b"secret data").unwrap();
        let decrypted = decrypt(&key2, &nonce, &ciphertext).unwrap();

        // Decryption never fails, it just does not recover the plaintext.
        assert_ne!(decrypted, b"secret data");
    }

    #[test]
    fn test_invalid_key_length() {
        let short_key = [0u8; 16];
        assert!(matches!(
            encrypt(&short_key, b"data"),
            Err(monovault_common::Error::InvalidKeyLength { .. })
        ));
        assert!(matches!(
            decrypt(&short_key, &Nonce::from_bytes([0u8; 16]), b"data"),
            Err(monovault_common::Error::InvalidKeyLength { .. })
        ));
    }

    #[test]
    fn test_empty_plaintext() {
        let key = [42u8; KEY_LENGTH];
        let (ciphertext, nonce) = encrypt(&key, b"").unwrap();
        assert!(ciphertext.is_empty());
        assert!(decrypt(&key, &nonce, &ciphertext).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_roundtrip(key in prop::array::uniform32(any::<u8>()),
                          plaintext in prop::collection::vec(any::<u8>(), 0..4096)) {
            let (ciphertext, nonce) = encrypt(&key, &plaintext).unwrap();
            let decrypted = decrypt(&key, &nonce, &ciphertext).unwrap();
            prop_assert_eq!(decrypted, plaintext);
        }
    }
}
