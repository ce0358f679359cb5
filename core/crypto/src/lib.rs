//! Cryptographic primitives for MonoVault.
//!
//! This module provides:
//! - Secure random byte generation
//! - Key derivation using PBKDF2-HMAC-SHA256
//! - Stream encryption using AES-256-CTR
//! - Keyed integrity tags using HMAC-SHA256
//! - Secure key management with automatic zeroization
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Tag verification is constant-time

pub mod cipher;
pub mod kdf;
pub mod keys;
pub mod mac;
pub mod random;

pub use cipher::{decrypt, encrypt};
pub use kdf::{derive_key, PBKDF2_ITERATIONS};
pub use keys::{DerivedKey, Nonce, Salt, VolumeKey, KEY_LENGTH, NONCE_LENGTH, SALT_LENGTH};
pub use mac::{compute_tag, verify_tag, TAG_LENGTH};
pub use random::{fill_random, random_bytes};
