//! Common error types for MonoVault.

use thiserror::Error;

/// Top-level error type for MonoVault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The system random source could not supply the requested bytes.
    #[error("Entropy source failure: {0}")]
    Entropy(String),

    /// A symmetric key of the wrong length was supplied.
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Header slot is structurally unreadable. Raised both for truncated
    /// blobs and for decryptions that produce a payload of the wrong size,
    /// which is the only observable signal of a wrong password.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Container file ends at or before the declared region offset.
    #[error("Vault too small: file is {file_size} bytes, region starts at {offset}")]
    VaultTooSmall { file_size: u64, offset: u64 },

    /// Region is present but too short to hold a ciphertext and a tag.
    #[error("Filesystem region too small: {remaining} bytes after nonce")]
    RegionTooSmall { remaining: u64 },

    /// Region authentication tag did not verify. Tamper or corruption.
    #[error("Region integrity check failed")]
    Integrity,

    /// Region contents could not be serialized for encryption.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Region decrypted and authenticated but could not be decoded.
    #[error("Region decode error: {0}")]
    Decode(String),

    /// Header slot could not be decrypted with the supplied password. The
    /// two causes are indistinguishable by design: no integrity tag
    /// protects the header blob.
    #[error("Wrong password or corrupted vault")]
    WrongPasswordOrCorrupt,

    /// Cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No live entry at the given path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A live entry already occupies the given path.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Entry at the path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Entry at the path is not a regular file.
    #[error("Not a file: {0}")]
    NotAFile(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_and_decode_errors_are_distinct() {
        let ser = Error::Serialization("cbor write failed".to_string());
        let de = Error::Decode("cbor read failed".to_string());
        assert_eq!(ser.to_string(), "Serialization error: cbor write failed");
        assert_eq!(de.to_string(), "Region decode error: cbor read failed");
    }
}
