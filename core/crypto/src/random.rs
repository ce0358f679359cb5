//! Cryptographically secure random byte generation.
//!
//! All randomness is drawn from the operating system source. Failures are
//! surfaced as [`Error::Entropy`] instead of panicking, so callers can
//! abort the operation cleanly.

use rand::{rngs::OsRng, TryRngCore};

use monovault_common::{Error, Result};

/// Fill `dest` with cryptographically secure random bytes.
///
/// # Errors
/// - Returns [`Error::Entropy`] if the OS random source fails
pub fn fill_random(dest: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(dest)
        .map_err(|e| Error::Entropy(e.to_string()))
}

/// Generate `n` cryptographically secure random bytes.
///
/// # Errors
/// - Returns [`Error::Entropy`] if the OS random source fails
pub fn random_bytes(n: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; n];
    fill_random(&mut bytes)?;
    Ok(bytes)
}
