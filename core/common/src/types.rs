//! Wire types shared between the container codecs and their callers.
//!
//! These structs travel through the encrypted filesystem region and must
//! keep a stable serde shape: field order is serialization order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a file table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    File,
    Directory,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::File => write!(f, "file"),
            FileType::Directory => write!(f, "dir"),
        }
    }
}

/// Declared capacity counters for the vault.
///
/// The counters are set once at container creation and never recomputed
/// from actual usage; the container does not allocate blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Superblock {
    pub total_blocks: u64,
    pub free_blocks: u64,
    pub file_entries_count: u32,
}

impl Superblock {
    /// Counters written into a freshly created container.
    pub fn initial() -> Self {
        Self {
            total_blocks: 100,
            free_blocks: 97,
            file_entries_count: 1,
        }
    }
}

/// One slot of the file table.
///
/// A live entry (`used == true`) is identified by its absolute `path`;
/// no two live entries share a path. Removal flips `used` to false and
/// leaves the slot in place for reuse (tombstone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub entry_type: FileType,
    pub used: bool,
    pub path: String,
    pub content: String,
}

impl FileEntry {
    /// Create a live directory entry.
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type: FileType::Directory,
            used: true,
            path: path.into(),
            content: String::new(),
        }
    }

    /// Create a live file entry with empty content.
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type: FileType::File,
            used: true,
            path: path.into(),
            content: String::new(),
        }
    }

    /// The root directory entry present in every freshly created vault.
    pub fn root() -> Self {
        Self::directory("root", "/")
    }

    pub fn is_directory(&self) -> bool {
        self.entry_type == FileType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == FileType::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_entry() {
        let root = FileEntry::root();
        assert!(root.used);
        assert!(root.is_directory());
        assert_eq!(root.path, "/");
    }

    #[test]
    fn test_file_type_display() {
        assert_eq!(FileType::File.to_string(), "file");
        assert_eq!(FileType::Directory.to_string(), "dir");
    }

    #[test]
    fn test_initial_superblock() {
        let sb = Superblock::initial();
        assert_eq!(sb.total_blocks, 100);
        assert_eq!(sb.free_blocks, 97);
        assert_eq!(sb.file_entries_count, 1);
    }
}
