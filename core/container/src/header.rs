//! Header slot codec.
//!
//! The header payload holds the random volume key and the volume metadata,
//! encrypted under a key derived from the user password. The encrypted
//! blob has a fixed size, so slot `i` lives at byte `i * HEADER_SLOT_SIZE`
//! and can be read or written with a single positioned I/O operation.
//!
//! # On-disk blob layout (84 bytes)
//!
//! | Offset | Size | Description |
//! |--------|------|-------------|
//! | 0      | 16   | KDF salt |
//! | 16     | 16   | AES-CTR nonce |
//! | 32     | 52   | Encrypted payload (key ‖ LE offset ‖ LE size ‖ LE fs_id) |
//!
//! The blob carries no integrity tag. A wrong password is only detected
//! by the payload-size check after decryption, so wrong-password and
//! corrupted-header are indistinguishable to callers.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use zeroize::Zeroize;

use monovault_common::{Error, Result};
use monovault_crypto::{
    cipher, derive_key, Nonce, Salt, VolumeKey, KEY_LENGTH, NONCE_LENGTH, SALT_LENGTH,
};

/// Serialized header payload size: key(32) + offset(8) + size(8) + fs_id(4).
pub const HEADER_PAYLOAD_SIZE: usize = KEY_LENGTH + 8 + 8 + 4;

/// Full encrypted slot size: salt + nonce + payload.
pub const HEADER_SLOT_SIZE: usize = SALT_LENGTH + NONCE_LENGTH + HEADER_PAYLOAD_SIZE;

/// Byte offset where the encrypted filesystem region begins. The gap
/// between the first header slot and this offset is reserved for future
/// additional slots.
pub const DEFAULT_VOLUME_OFFSET: u64 = 512;

/// Decrypted header contents. Exists only in memory.
#[derive(Debug, Clone)]
pub struct HeaderPayload {
    volume_key: VolumeKey,
    pub volume_offset: u64,
    pub volume_size: u64,
    pub fs_id: u32,
}

impl HeaderPayload {
    /// Create a fresh payload with a newly generated volume key.
    ///
    /// The volume key is generated exactly once here; every region write
    /// for the lifetime of the container uses this same key.
    ///
    /// # Errors
    /// - Returns [`Error::Entropy`] if key generation fails
    pub fn new(fs_id: u32) -> Result<Self> {
        Ok(Self {
            volume_key: VolumeKey::generate()?,
            volume_offset: DEFAULT_VOLUME_OFFSET,
            volume_size: 0,
            fs_id,
        })
    }

    /// Get the volume key.
    pub fn volume_key(&self) -> &VolumeKey {
        &self.volume_key
    }

    /// Serialize to the fixed binary layout.
    fn encode(&self) -> [u8; HEADER_PAYLOAD_SIZE] {
        let mut buf = [0u8; HEADER_PAYLOAD_SIZE];
        buf[..KEY_LENGTH].copy_from_slice(self.volume_key.as_bytes());
        buf[KEY_LENGTH..KEY_LENGTH + 8].copy_from_slice(&self.volume_offset.to_le_bytes());
        buf[KEY_LENGTH + 8..KEY_LENGTH + 16].copy_from_slice(&self.volume_size.to_le_bytes());
        buf[KEY_LENGTH + 16..].copy_from_slice(&self.fs_id.to_le_bytes());
        buf
    }

    /// Parse the fixed binary layout.
    ///
    /// # Errors
    /// - Returns [`Error::MalformedHeader`] if `bytes` is not exactly
    ///   [`HEADER_PAYLOAD_SIZE`] long. After decryption this length check
    ///   is the only observable wrong-password signal.
    fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HEADER_PAYLOAD_SIZE {
            return Err(Error::MalformedHeader(format!(
                "invalid payload size: expected {}, got {}",
                HEADER_PAYLOAD_SIZE,
                bytes.len()
            )));
        }

        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&bytes[..KEY_LENGTH]);

        let mut u64_buf = [0u8; 8];
        u64_buf.copy_from_slice(&bytes[KEY_LENGTH..KEY_LENGTH + 8]);
        let volume_offset = u64::from_le_bytes(u64_buf);
        u64_buf.copy_from_slice(&bytes[KEY_LENGTH + 8..KEY_LENGTH + 16]);
        let volume_size = u64::from_le_bytes(u64_buf);

        let mut u32_buf = [0u8; 4];
        u32_buf.copy_from_slice(&bytes[KEY_LENGTH + 16..]);
        let fs_id = u32::from_le_bytes(u32_buf);

        Ok(Self {
            volume_key: VolumeKey::from_bytes(key),
            volume_offset,
            volume_size,
            fs_id,
        })
    }
}

/// Encrypt a header payload under a password.
///
/// Draws a fresh salt and nonce on every call, so encrypting the same
/// payload twice yields different blobs.
///
/// # Postconditions
/// - Returns `salt ‖ nonce ‖ ciphertext`, exactly [`HEADER_SLOT_SIZE`] bytes
pub fn encrypt_header(payload: &HeaderPayload, password: &str) -> Result<Vec<u8>> {
    let salt = Salt::generate()?;
    let key = derive_key(password, &salt)?;

    let mut plain = payload.encode();
    let result = cipher::encrypt(key.as_bytes(), &plain);
    plain.zeroize();
    let (ciphertext, nonce) = result?;

    let mut blob = Vec::with_capacity(HEADER_SLOT_SIZE);
    blob.extend_from_slice(salt.as_bytes());
    blob.extend_from_slice(nonce.as_bytes());
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a header blob with a password.
///
/// Decryption itself cannot fail for a wrong password; it produces
/// garbage. The payload-size check in [`HeaderPayload::decode`] is what
/// rejects it, and a garbage payload of the right length would pass
/// undetected here, to be caught by region verification downstream.
///
/// # Errors
/// - Returns [`Error::MalformedHeader`] if the blob is too short or the
///   decrypted payload has the wrong size
pub fn decrypt_header(blob: &[u8], password: &str) -> Result<HeaderPayload> {
    if blob.len() < SALT_LENGTH + NONCE_LENGTH {
        return Err(Error::MalformedHeader(format!(
            "blob too short: {} bytes",
            blob.len()
        )));
    }

    let mut salt = [0u8; SALT_LENGTH];
    salt.copy_from_slice(&blob[..SALT_LENGTH]);
    let mut nonce = [0u8; NONCE_LENGTH];
    nonce.copy_from_slice(&blob[SALT_LENGTH..SALT_LENGTH + NONCE_LENGTH]);
    let ciphertext = &blob[SALT_LENGTH + NONCE_LENGTH..];

    let key = derive_key(password, &Salt::from_bytes(salt))?;
    let mut plain = cipher::decrypt(key.as_bytes(), &Nonce::from_bytes(nonce), ciphertext)?;

    let payload = HeaderPayload::decode(&plain);
    plain.zeroize();
    payload
}

/// Write a header blob into slot `slot` of an open container file.
pub fn write_header_slot(file: &mut File, slot: u64, blob: &[u8]) -> Result<()> {
    if blob.len() != HEADER_SLOT_SIZE {
        return Err(Error::InvalidInput(format!(
            "header blob must be {} bytes, got {}",
            HEADER_SLOT_SIZE,
            blob.len()
        )));
    }
    file.seek(SeekFrom::Start(slot * HEADER_SLOT_SIZE as u64))?;
    file.write_all(blob)?;
    Ok(())
}

/// Read the header blob from slot `slot` of the container file at `path`.
pub fn read_header_slot(path: &Path, slot: u64) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(slot * HEADER_SLOT_SIZE as u64))?;

    let mut blob = vec![0u8; HEADER_SLOT_SIZE];
    file.read_exact(&mut blob)?;
    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_size_constants() {
        assert_eq!(HEADER_PAYLOAD_SIZE, 52);
        assert_eq!(HEADER_SLOT_SIZE, 84);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let payload = HeaderPayload::new(7).unwrap();
        let blob = encrypt_header(&payload, "correct-horse").unwrap();
        assert_eq!(blob.len(), HEADER_SLOT_SIZE);

        let decrypted = decrypt_header(&blob, "correct-horse").unwrap();
        assert_eq!(decrypted.volume_key.as_bytes(), payload.volume_key.as_bytes());
        assert_eq!(decrypted.volume_offset, payload.volume_offset);
        assert_eq!(decrypted.volume_size, payload.volume_size);
        assert_eq!(decrypted.fs_id, payload.fs_id);
    }

    #[test]
    fn test_fresh_salt_and_nonce_per_encryption() {
        let payload = HeaderPayload::new(0).unwrap();
        let blob1 = encrypt_header(&payload, "pw").unwrap();
        let blob2 = encrypt_header(&payload, "pw").unwrap();

        assert_ne!(blob1[..SALT_LENGTH], blob2[..SALT_LENGTH]);
        assert_ne!(
            blob1[SALT_LENGTH..SALT_LENGTH + NONCE_LENGTH],
            blob2[SALT_LENGTH..SALT_LENGTH + NONCE_LENGTH]
        );
    }

    #[test]
    fn test_wrong_password_rejected_or_garbage() {
        let payload = HeaderPayload::new(0).unwrap();
        let blob = encrypt_header(&payload, "p1").unwrap();

        // With a full-size ciphertext the decrypted garbage has the right
        // length, so decoding succeeds. The recovered key must still be
        // wrong; region verification is the authoritative check.
        match decrypt_header(&blob, "wrong") {
            Err(Error::MalformedHeader(_)) => {}
            Ok(garbage) => {
                assert_ne!(
                    garbage.volume_key.as_bytes(),
                    payload.volume_key.as_bytes()
                );
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_short_blob_rejected() {
        let result = decrypt_header(&[0u8; SALT_LENGTH + NONCE_LENGTH - 1], "pw");
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let payload = HeaderPayload::new(0).unwrap();
        let blob = encrypt_header(&payload, "pw").unwrap();

        // Chop the ciphertext: decrypted payload no longer has the exact
        // expected size.
        let result = decrypt_header(&blob[..HEADER_SLOT_SIZE - 1], "pw");
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_slot_io_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.dat");

        let payload = HeaderPayload::new(3).unwrap();
        let blob = encrypt_header(&payload, "pw").unwrap();

        let mut file = File::create(&path).unwrap();
        write_header_slot(&mut file, 0, &blob).unwrap();
        drop(file);

        let read_back = read_header_slot(&path, 0).unwrap();
        assert_eq!(read_back, blob);
    }
}
