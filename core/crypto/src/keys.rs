//! Key, salt and nonce types with secure memory handling.
//!
//! Key types automatically zeroize their memory on drop to prevent
//! sensitive data from persisting in memory.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::random::fill_random;
use monovault_common::Result;

/// Length of symmetric encryption keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of key-derivation salts in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of stream-cipher nonces in bytes.
pub const NONCE_LENGTH: usize = 16;

/// Random volume key, generated once per container.
///
/// This key encrypts the filesystem region for the whole lifetime of the
/// container. It never appears on disk outside the password-encrypted
/// header blob.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VolumeKey {
    key: [u8; KEY_LENGTH],
}

impl VolumeKey {
    /// Generate a fresh random volume key.
    ///
    /// # Errors
    /// - Returns error if the OS random source fails
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; KEY_LENGTH];
        fill_random(&mut key)?;
        Ok(Self { key })
    }

    /// Create a volume key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for VolumeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VolumeKey([REDACTED])")
    }
}

/// Key derived from the user password, used only for header encryption.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a derived key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey([REDACTED])")
    }
}

/// Salt for key derivation. Fresh per header encryption, stored in clear
/// at the front of the header blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Generate a random salt.
    pub fn generate() -> Result<Self> {
        let mut salt = [0u8; SALT_LENGTH];
        fill_random(&mut salt)?;
        Ok(Self(salt))
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

/// Stream-cipher nonce. Fresh per encryption; reuse under the same key
/// breaks confidentiality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LENGTH]);

impl Nonce {
    /// Generate a random nonce.
    pub fn generate() -> Result<Self> {
        let mut nonce = [0u8; NONCE_LENGTH];
        fill_random(&mut nonce)?;
        Ok(Self(nonce))
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the nonce bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LENGTH] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_key_generate_distinct() {
        let key1 = VolumeKey::generate().unwrap();
        let key2 = VolumeKey::generate().unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_salt_generate_distinct() {
        let salt1 = Salt::generate().unwrap();
        let salt2 = Salt::generate().unwrap();
        assert_ne!(salt1.as_bytes(), salt2.as_bytes());
    }

    #[test]
    fn test_nonce_roundtrip() {
        let nonce = Nonce::from_bytes([7u8; NONCE_LENGTH]);
        assert_eq!(nonce.as_bytes(), &[7u8; NONCE_LENGTH]);
    }

    #[test]
    fn test_key_debug_redacted() {
        let key = VolumeKey::from_bytes([1u8; KEY_LENGTH]);
        assert_eq!(format!("{:?}", key), "VolumeKey([REDACTED])");
    }
}
