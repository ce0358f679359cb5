//! In-memory file table.
//!
//! The table is a growable ordered sequence of [`FileEntry`] slots.
//! Removal only flips the `used` flag (tombstone); the next creation
//! reuses the first tombstoned slot before growing the sequence. The
//! absolute `path` of a live entry is its identity; slot indices carry
//! no meaning and paths of removed entries may be reused once their slot
//! is reassigned.

use monovault_common::{Error, FileEntry, FileType, Result};

/// Slot count reserved up front before the table has to grow.
pub const INITIAL_FILE_ENTRIES: usize = 128;

/// Join a directory path and a child name into an absolute path.
pub fn join_path(base: &str, name: &str) -> String {
    if base == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", base, name)
    }
}

/// Parent directory of an absolute path. The root has no parent.
pub fn parent_path(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Final component of an absolute path.
fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The ordered file table with tombstone slot reuse.
#[derive(Debug, Clone)]
pub struct FileTable {
    entries: Vec<FileEntry>,
}

impl FileTable {
    /// Create a fresh table containing only the root directory.
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(INITIAL_FILE_ENTRIES);
        entries.push(FileEntry::root());
        Self { entries }
    }

    /// Rebuild a table from entries decoded out of the region.
    pub fn from_entries(entries: Vec<FileEntry>) -> Self {
        Self { entries }
    }

    /// The ordered slot sequence, tombstones included. This is the exact
    /// sequence serialized into the region.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Number of live entries.
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.used).count()
    }

    /// Find the live entry at `path`.
    pub fn find(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.used && e.path == path)
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut FileEntry> {
        self.entries.iter_mut().find(|e| e.used && e.path == path)
    }

    /// Place `entry` into the first tombstoned slot, growing if none.
    fn allocate(&mut self, entry: FileEntry) {
        match self.entries.iter_mut().find(|e| !e.used) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    fn check_absent(&self, path: &str) -> Result<()> {
        if self.find(path).is_some() {
            return Err(Error::AlreadyExists(path.to_string()));
        }
        Ok(())
    }

    /// Create a directory at the absolute `path`.
    ///
    /// # Errors
    /// - [`Error::AlreadyExists`] if a live entry occupies `path`
    pub fn create_directory(&mut self, path: &str) -> Result<()> {
        self.check_absent(path)?;
        self.allocate(FileEntry::directory(base_name(path), path));
        Ok(())
    }

    /// Create an empty file at the absolute `path`.
    ///
    /// # Errors
    /// - [`Error::AlreadyExists`] if a live entry occupies `path`
    pub fn create_file(&mut self, path: &str) -> Result<()> {
        self.check_absent(path)?;
        self.allocate(FileEntry::file(base_name(path), path));
        Ok(())
    }

    /// Replace the content of the file at `path`.
    pub fn write_file(&mut self, path: &str, content: &str) -> Result<()> {
        let entry = self
            .find_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        if !entry.is_file() {
            return Err(Error::NotAFile(path.to_string()));
        }
        entry.content = content.to_string();
        Ok(())
    }

    /// Append to the content of the file at `path`.
    pub fn append_file(&mut self, path: &str, content: &str) -> Result<()> {
        let entry = self
            .find_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        if !entry.is_file() {
            return Err(Error::NotAFile(path.to_string()));
        }
        entry.content.push_str(content);
        Ok(())
    }

    /// Read the content of the file at `path`.
    pub fn read_file(&self, path: &str) -> Result<&str> {
        let entry = self
            .find(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        if !entry.is_file() {
            return Err(Error::NotAFile(path.to_string()));
        }
        Ok(&entry.content)
    }

    /// Tombstone the entry at `path`. The slot stays in place for reuse.
    ///
    /// # Errors
    /// - [`Error::InvalidInput`] for the root directory
    /// - [`Error::NotFound`] if no live entry occupies `path`
    pub fn remove(&mut self, path: &str) -> Result<()> {
        if path == "/" {
            return Err(Error::InvalidInput("cannot remove root".to_string()));
        }
        let entry = self
            .find_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        entry.used = false;
        Ok(())
    }

    /// Live direct children of the directory at `dir_path`.
    ///
    /// # Errors
    /// - [`Error::NotFound`] / [`Error::NotADirectory`] if `dir_path` is
    ///   not a live directory
    pub fn list(&self, dir_path: &str) -> Result<Vec<&FileEntry>> {
        let dir = self
            .find(dir_path)
            .ok_or_else(|| Error::NotFound(dir_path.to_string()))?;
        if dir.entry_type != FileType::Directory {
            return Err(Error::NotADirectory(dir_path.to_string()));
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| e.used && parent_path(&e.path) == Some(dir_path))
            .collect())
    }
}

impl Default for FileTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_helpers() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/a", "b"), "/a/b");
        assert_eq!(parent_path("/"), None);
        assert_eq!(parent_path("/a"), Some("/"));
        assert_eq!(parent_path("/a/b"), Some("/a"));
    }

    #[test]
    fn test_new_table_has_root() {
        let table = FileTable::new();
        assert_eq!(table.live_count(), 1);
        assert!(table.find("/").unwrap().is_directory());
    }

    #[test]
    fn test_create_and_read_file() {
        let mut table = FileTable::new();
        table.create_file("/a.txt").unwrap();
        table.write_file("/a.txt", "hello").unwrap();

        assert_eq!(table.read_file("/a.txt").unwrap(), "hello");
    }

    #[test]
    fn test_append() {
        let mut table = FileTable::new();
        table.create_file("/a.txt").unwrap();
        table.append_file("/a.txt", "hello ").unwrap();
        table.append_file("/a.txt", "world").unwrap();

        assert_eq!(table.read_file("/a.txt").unwrap(), "hello world");
    }

    #[test]
    fn test_live_path_uniqueness() {
        let mut table = FileTable::new();
        table.create_file("/a.txt").unwrap();

        assert!(matches!(
            table.create_file("/a.txt"),
            Err(Error::AlreadyExists(_))
        ));
        assert!(matches!(
            table.create_directory("/a.txt"),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_remove_tombstones_slot() {
        let mut table = FileTable::new();
        table.create_file("/a.txt").unwrap();
        let slots_before = table.entries().len();

        table.remove("/a.txt").unwrap();
        assert_eq!(table.entries().len(), slots_before);
        assert!(table.find("/a.txt").is_none());
        assert!(!table.entries()[1].used);
    }

    #[test]
    fn test_tombstone_slot_reused() {
        let mut table = FileTable::new();
        table.create_file("/a.txt").unwrap();
        table.remove("/a.txt").unwrap();
        let slots = table.entries().len();

        table.create_file("/b.txt").unwrap();
        assert_eq!(table.entries().len(), slots);
        assert_eq!(table.entries()[1].path, "/b.txt");
    }

    #[test]
    fn test_path_reusable_after_removal() {
        let mut table = FileTable::new();
        table.create_file("/a.txt").unwrap();
        table.write_file("/a.txt", "old").unwrap();
        table.remove("/a.txt").unwrap();

        table.create_file("/a.txt").unwrap();
        assert_eq!(table.read_file("/a.txt").unwrap(), "");
    }

    #[test]
    fn test_cannot_remove_root() {
        let mut table = FileTable::new();
        assert!(matches!(
            table.remove("/"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_list_direct_children_only() {
        let mut table = FileTable::new();
        table.create_directory("/docs").unwrap();
        table.create_file("/docs/a.txt").unwrap();
        table.create_file("/docs/b.txt").unwrap();
        table.create_file("/top.txt").unwrap();

        let root_children: Vec<&str> =
            table.list("/").unwrap().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(root_children, vec!["docs", "top.txt"]);

        let docs_children: Vec<&str> =
            table.list("/docs").unwrap().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(docs_children, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_write_to_directory_rejected() {
        let mut table = FileTable::new();
        table.create_directory("/docs").unwrap();

        assert!(matches!(
            table.write_file("/docs", "x"),
            Err(Error::NotAFile(_))
        ));
        assert!(matches!(table.read_file("/docs"), Err(Error::NotAFile(_))));
    }

    #[test]
    fn test_list_on_file_rejected() {
        let mut table = FileTable::new();
        table.create_file("/a.txt").unwrap();

        assert!(matches!(
            table.list("/a.txt"),
            Err(Error::NotADirectory(_))
        ));
    }
}
