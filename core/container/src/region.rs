//! Filesystem region codec.
//!
//! The region holds the serialized `(Superblock, file table)` pair,
//! encrypted under the volume key and authenticated with HMAC-SHA256.
//! It starts at the offset recorded in the header payload and always
//! occupies the tail of the container file: every write truncates the
//! file to exactly the region end, so there is no fragmentation and no
//! stale trailing data.
//!
//! # On-disk frame layout
//!
//! | Offset         | Size | Description |
//! |----------------|------|-------------|
//! | 0              | 16   | AES-CTR nonce, fresh per write |
//! | 16             | n    | Ciphertext of the CBOR-encoded pair |
//! | 16 + n         | 32   | HMAC-SHA256 over nonce ‖ ciphertext |

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use monovault_common::{Error, FileEntry, Result, Superblock};
use monovault_crypto::{cipher, compute_tag, verify_tag, Nonce, VolumeKey, NONCE_LENGTH, TAG_LENGTH};

/// Encode the superblock and the ordered entry sequence.
fn encode(superblock: &Superblock, entries: &[FileEntry]) -> Result<Vec<u8>> {
    let mut plain = Vec::new();
    ciborium::ser::into_writer(&(superblock, entries), &mut plain)
        .map_err(|e| Error::Serialization(format!("region encode failed: {}", e)))?;
    Ok(plain)
}

/// Decode the superblock and entry sequence written by [`encode`].
fn decode(plain: &[u8]) -> Result<(Superblock, Vec<FileEntry>)> {
    ciborium::de::from_reader(plain).map_err(|e| Error::Decode(e.to_string()))
}

/// Encrypt and persist the filesystem region at `offset`.
///
/// # Postconditions
/// - The file holds `nonce ‖ ciphertext ‖ mac` starting at `offset`
/// - The file is truncated to exactly the region end
///
/// # Errors
/// - Entropy, encoding, or I/O failure
pub fn write_region(
    path: &Path,
    key: &VolumeKey,
    offset: u64,
    superblock: &Superblock,
    entries: &[FileEntry],
) -> Result<()> {
    let plain = encode(superblock, entries)?;
    let (ciphertext, nonce) = cipher::encrypt(key.as_bytes(), &plain)?;

    let mut authed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    authed.extend_from_slice(nonce.as_bytes());
    authed.extend_from_slice(&ciphertext);
    let mac = compute_tag(key.as_bytes(), &authed)?;

    let mut file = OpenOptions::new().write(true).create(true).open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(nonce.as_bytes())?;
    file.write_all(&ciphertext)?;
    file.write_all(&mac)?;

    let end = offset + (NONCE_LENGTH + ciphertext.len() + TAG_LENGTH) as u64;
    file.set_len(end)?;

    debug!(
        offset,
        ciphertext_len = ciphertext.len(),
        "Wrote filesystem region"
    );
    Ok(())
}

/// Read, verify and decrypt the filesystem region at `offset`.
///
/// # Errors
/// - [`Error::VaultTooSmall`] if the file ends at or before `offset`
/// - [`Error::RegionTooSmall`] if there is no room for ciphertext and tag
/// - [`Error::Integrity`] if the tag does not verify; this is the
///   authoritative tamper and corruption check
/// - [`Error::Decode`] if the authenticated plaintext is structurally
///   unreadable (format mismatch)
pub fn read_region(
    path: &Path,
    key: &VolumeKey,
    offset: u64,
) -> Result<(Superblock, Vec<FileEntry>)> {
    let mut file = OpenOptions::new().read(true).open(path)?;
    let file_size = file.metadata()?.len();

    if file_size <= offset {
        return Err(Error::VaultTooSmall { file_size, offset });
    }

    file.seek(SeekFrom::Start(offset))?;
    let mut nonce = [0u8; NONCE_LENGTH];
    file.read_exact(&mut nonce)?;

    let remaining = file_size - offset - NONCE_LENGTH as u64;
    if remaining <= TAG_LENGTH as u64 {
        return Err(Error::RegionTooSmall { remaining });
    }

    let ciphertext_len = (remaining - TAG_LENGTH as u64) as usize;
    let mut ciphertext = vec![0u8; ciphertext_len];
    file.read_exact(&mut ciphertext)?;
    let mut mac = [0u8; TAG_LENGTH];
    file.read_exact(&mut mac)?;

    let mut authed = Vec::with_capacity(NONCE_LENGTH + ciphertext_len);
    authed.extend_from_slice(&nonce);
    authed.extend_from_slice(&ciphertext);
    if !verify_tag(key.as_bytes(), &authed, &mac)? {
        return Err(Error::Integrity);
    }

    let plain = cipher::decrypt(key.as_bytes(), &Nonce::from_bytes(nonce), &ciphertext)?;
    let decoded = decode(&plain)?;

    debug!(offset, ciphertext_len, "Read filesystem region");
    Ok(decoded)
}
