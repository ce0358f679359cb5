//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is fixed: it is part of the on-disk format, which
//! carries no KDF parameters. Changing it breaks every existing vault.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;

use crate::keys::{DerivedKey, Salt, KEY_LENGTH};
use monovault_common::{Error, Result};

/// PBKDF2 iteration count for header key derivation.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a header-encryption key from a password and salt.
///
/// Deterministic for a given `(password, salt)` pair. The derived key is
/// used only to encrypt the header slot; the volume key protecting the
/// filesystem region is independently random.
///
/// # Errors
/// - Returns error if the underlying PRF rejects the output length
pub fn derive_key(password: &str, salt: &Salt) -> Result<DerivedKey> {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<Hmac<Sha256>>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key,
    )
    .map_err(|e| Error::Crypto(format!("Key derivation failed: {}", e)))?;
    Ok(DerivedKey::from_bytes(key))
}
