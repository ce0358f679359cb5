//! Container lifecycle: create, mount, save.
//!
//! A [`MountedContainer`] exclusively owns the decrypted header payload
//! (and with it the volume key), the superblock, and the in-memory file
//! table for the lifetime of the process. No global state: several
//! containers can coexist in one process.
//!
//! Every mutating table operation persists the region before returning,
//! so on-disk state never diverges from memory across restarts. There is
//! no write-ahead log and no atomic rename; a crash mid-write can leave
//! the region unreadable.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::header::{
    decrypt_header, encrypt_header, read_header_slot, write_header_slot, HeaderPayload,
};
use crate::region::{read_region, write_region};
use crate::table::FileTable;
use monovault_common::{Error, FileEntry, Result, Superblock};

/// Conventional container file name.
pub const DEFAULT_VAULT_FILE: &str = "vault.dat";

/// A mounted container with its decrypted state.
pub struct MountedContainer {
    path: PathBuf,
    header: HeaderPayload,
    superblock: Superblock,
    table: FileTable,
    current_path: String,
}

impl MountedContainer {
    /// Create a new container file at `path`.
    ///
    /// Generates a fresh volume key, writes the password-encrypted header
    /// into slot 0 (truncating any existing file), and persists an empty
    /// filesystem region holding only the root directory.
    ///
    /// # Errors
    /// - Entropy, crypto, or I/O failure
    pub fn create(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), "Creating new container");

        let header = HeaderPayload::new(0)?;
        let blob = encrypt_header(&header, password)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        write_header_slot(&mut file, 0, &blob)?;
        drop(file);

        let container = Self {
            path,
            header,
            superblock: Superblock::initial(),
            table: FileTable::new(),
            current_path: "/".to_string(),
        };
        container.save()?;
        Ok(container)
    }

    /// Mount an existing container file at `path`.
    ///
    /// # Errors
    /// - [`Error::WrongPasswordOrCorrupt`] if the header slot does not
    ///   decrypt with `password`; wrong password and header corruption are
    ///   deliberately indistinguishable
    /// - Region-stage errors ([`Error::VaultTooSmall`],
    ///   [`Error::RegionTooSmall`], [`Error::Integrity`], [`Error::Decode`])
    ///   propagate unchanged; they all mean the vault is corrupted for this
    ///   mount attempt
    pub fn mount(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(path = %path.display(), "Mounting container");

        let blob = read_header_slot(&path, 0)?;
        let header = decrypt_header(&blob, password).map_err(|e| match e {
            Error::MalformedHeader(_) => Error::WrongPasswordOrCorrupt,
            other => other,
        })?;

        let (superblock, entries) =
            read_region(&path, header.volume_key(), header.volume_offset)?;

        info!(path = %path.display(), "Container mounted");
        Ok(Self {
            path,
            header,
            superblock,
            table: FileTable::from_entries(entries),
            current_path: "/".to_string(),
        })
    }

    /// Create the container if absent, otherwise mount it.
    pub fn init_or_load(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        if path.as_ref().exists() {
            Self::mount(path, password)
        } else {
            Self::create(path, password)
        }
    }

    /// Persist the current in-memory superblock and table.
    pub fn save(&self) -> Result<()> {
        write_region(
            &self.path,
            self.header.volume_key(),
            self.header.volume_offset,
            &self.superblock,
            self.table.entries(),
        )
    }

    /// Path of the container file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opaque filesystem identifier from the header.
    pub fn fs_id(&self) -> u32 {
        self.header.fs_id
    }

    /// Byte offset of the filesystem region.
    pub fn volume_offset(&self) -> u64 {
        self.header.volume_offset
    }

    /// Current in-memory superblock.
    pub fn superblock(&self) -> &Superblock {
        &self.superblock
    }

    /// Current in-memory file table.
    pub fn table(&self) -> &FileTable {
        &self.table
    }

    /// Current working directory, absolute.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Change the working directory to the live directory at `path`.
    ///
    /// # Errors
    /// - [`Error::NotFound`] / [`Error::NotADirectory`] otherwise
    pub fn change_dir(&mut self, path: &str) -> Result<()> {
        if path != "/" {
            let entry = self
                .table
                .find(path)
                .ok_or_else(|| Error::NotFound(path.to_string()))?;
            if !entry.is_directory() {
                return Err(Error::NotADirectory(path.to_string()));
            }
        }
        self.current_path = path.to_string();
        Ok(())
    }

    // Mutating table operations. Each persists the region before
    // returning, keeping disk and memory in lockstep.

    /// Create a directory at the absolute `path` and save.
    pub fn create_directory(&mut self, path: &str) -> Result<()> {
        self.table.create_directory(path)?;
        self.save()
    }

    /// Create an empty file at the absolute `path` and save.
    pub fn create_file(&mut self, path: &str) -> Result<()> {
        self.table.create_file(path)?;
        self.save()
    }

    /// Replace the content of the file at `path` and save.
    pub fn write_file(&mut self, path: &str, content: &str) -> Result<()> {
        self.table.write_file(path, content)?;
        self.save()
    }

    /// Append to the file at `path` and save.
    pub fn append_file(&mut self, path: &str, content: &str) -> Result<()> {
        self.table.append_file(path, content)?;
        self.save()
    }

    /// Tombstone the entry at `path` and save.
    pub fn remove(&mut self, path: &str) -> Result<()> {
        self.table.remove(path)?;
        self.save()
    }

    /// Read the content of the file at `path`.
    pub fn read_file(&self, path: &str) -> Result<&str> {
        self.table.read_file(path)
    }

    /// Live direct children of the directory at `path`.
    pub fn list(&self, path: &str) -> Result<Vec<&FileEntry>> {
        self.table.list(path)
    }
}

impl std::fmt::Debug for MountedContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedContainer")
            .field("path", &self.path)
            .field("current_path", &self.current_path)
            .field("live_entries", &self.table.live_count())
            .finish()
    }
}
