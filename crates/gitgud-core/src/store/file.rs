//! File-backed state store.
//!
//! One file per key inside the data directory. Values are plain text;
//! append-only keys grow one line at a time and are never rewritten.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use super::{data_dir, StateStore};
use crate::error::StoreError;

/// Store keyed by file name under a single directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store in the default data directory, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Open a store rooted at a specific directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory backing this store.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl StateStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key))
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::write(self.path(key), value).map_err(|source| StoreError::WriteFailed {
            key: key.to_string(),
            source,
        })
    }

    fn append(&self, key: &str, line: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(key))
            .map_err(|source| StoreError::WriteFailed {
                key: key.to_string(),
                source,
            })?;
        writeln!(file, "{line}").map_err(|source| StoreError::WriteFailed {
            key: key.to_string(),
            source,
        })
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::DeleteFailed {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.path(key).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::with_dir(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn read_missing_key_is_none() {
        let (_dir, store) = temp_store();
        assert!(store.read("nope").is_none());
        assert!(!store.exists("nope"));
    }

    #[test]
    fn write_then_read_roundtrip() {
        let (_dir, store) = temp_store();
        store.write("counter", "7").unwrap();
        assert_eq!(store.read("counter").as_deref(), Some("7"));
        assert!(store.exists("counter"));
    }

    #[test]
    fn read_trims_whitespace() {
        let (_dir, store) = temp_store();
        store.write("counter", "  7\n").unwrap();
        assert_eq!(store.read("counter").as_deref(), Some("7"));
    }

    #[test]
    fn append_accumulates_lines() {
        let (_dir, store) = temp_store();
        store.append("log", "one").unwrap();
        store.append("log", "two").unwrap();
        let content = store.read("log").unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, store) = temp_store();
        store.write("gone", "x").unwrap();
        store.delete("gone").unwrap();
        assert!(!store.exists("gone"));
        store.delete("gone").unwrap();
    }

    #[test]
    fn read_u32_substitutes_default_on_garbage() {
        let (_dir, store) = temp_store();
        store.write("counter", "not a number").unwrap();
        assert_eq!(store.read_u32("counter", 0), 0);
        assert_eq!(store.read_u32("missing", 3), 3);
    }
}
