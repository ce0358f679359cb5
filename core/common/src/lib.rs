//! Common utilities and types shared across MonoVault modules.
//!
//! This module provides the error taxonomy and the wire types that travel
//! through the encrypted filesystem region.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{FileEntry, FileType, Superblock};
