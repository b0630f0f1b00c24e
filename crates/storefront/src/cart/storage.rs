//! Durable key-value slots backing the cart store.
//!
//! The browser build keeps the cart in `localStorage`; here the same contract
//! is a small trait so the store can run against memory in tests and against
//! a directory of JSON files in a desktop or kiosk shell.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The key cannot be mapped to a slot.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string-keyed store of string values.
pub trait CartStorage {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Erase the slot. Removing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be removed.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Contents are lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with one slot, used to simulate a returning shopper.
    #[must_use]
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.to_string(), value.to_string());
        Self { slots }
    }

    /// Raw slot contents.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves either the old or the new cart, never half of one.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");

        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        };

        write().map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_slots() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load("dainam_cart").unwrap(), None);

        storage.save("dainam_cart", "[]").unwrap();
        assert_eq!(storage.load("dainam_cart").unwrap().as_deref(), Some("[]"));

        storage.remove("dainam_cart").unwrap();
        storage.remove("dainam_cart").unwrap();
        assert_eq!(storage.get("dainam_cart"), None);
    }

    #[test]
    fn test_file_storage_slots() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("state")).unwrap();

        assert_eq!(storage.load("dainam_cart").unwrap(), None);

        storage.save("dainam_cart", r#"[{"id":1}]"#).unwrap();
        assert!(storage.dir().join("dainam_cart.json").exists());
        assert!(!storage.dir().join("dainam_cart.json.tmp").exists());

        // A second handle on the same directory sees the write
        let reopened = FileStorage::open(storage.dir()).unwrap();
        assert_eq!(
            reopened.load("dainam_cart").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );

        storage.remove("dainam_cart").unwrap();
        assert_eq!(storage.load("dainam_cart").unwrap(), None);
        // Removing again is fine
        storage.remove("dainam_cart").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.save("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.load(""), Err(StorageError::InvalidKey(_))));
    }
}
