//! Encrypted single-file container for MonoVault.
//!
//! This module provides:
//! - The password-encrypted header slot codec
//! - The encrypted and authenticated filesystem region codec
//! - The in-memory file table with tombstone slot reuse
//! - The container lifecycle (create, mount, save)
//!
//! # Architecture
//! The lifecycle layer obtains the volume key by decrypting header slot 0
//! with the password-derived key, then reads or writes the filesystem
//! region under that volume key. Both codecs build on the primitives in
//! `monovault-crypto`.

pub mod container;
pub mod header;
pub mod region;
pub mod table;

pub use container::{MountedContainer, DEFAULT_VAULT_FILE};
pub use header::{
    decrypt_header, encrypt_header, HeaderPayload, DEFAULT_VOLUME_OFFSET, HEADER_PAYLOAD_SIZE,
    HEADER_SLOT_SIZE,
};
pub use region::{read_region, write_region};
pub use table::{join_path, parent_path, FileTable};
