//! Synchronous key/value storage for locally cached documents.
//!
//! This plays the role a browser's `localStorage` plays for the site: a
//! string-to-string map that survives restarts (with [`FileStorage`]) and
//! may refuse writes when full (with a quota on [`MemoryStorage`]).
//!
//! # Keys
//!
//! - `<name>_data` - last locally saved content document
//! - `<name>_lastSaved` - RFC 3339 timestamp of that save
//! - `i3fratelli_products` - versioned catalog snapshot

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage quota exceeded writing {key} (limit {limit} bytes)")]
    QuotaExceeded { key: String, limit: usize },
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// What happened to the local cache after an in-memory change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    /// The cache now holds the change.
    Stored(DateTime<Utc>),
    /// Nothing was written (e.g. an empty catalog is never cached).
    Skipped,
    /// The write failed; the change lives in memory only.
    Failed,
}

impl CacheWrite {
    /// Whether the change reached the cache.
    #[must_use]
    pub const fn is_stored(self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

/// Key for the last locally saved copy of a content document.
#[must_use]
pub fn data_key(name: &str) -> String {
    format!("{name}_data")
}

/// Key for the last-saved timestamp of a content document.
#[must_use]
pub fn last_saved_key(name: &str) -> String {
    format!("{name}_lastSaved")
}

/// A string key/value store with synchronous access.
pub trait LocalStorage: Send + Sync {
    /// Read a value, `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be stored (quota, IO).
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage, optionally bounded by a byte quota.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once keys plus values exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;

        if let Some(limit) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage backed by one file per key in a directory.
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.tmp"));
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(data_key("contact"), "contact_data");
        assert_eq!(last_saved_key("site"), "site_lastSaved");
    }

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("a", "12345").unwrap();

        let err = storage.set_item("b", "123456").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit: 10, .. }));
        assert_eq!(storage.get_item("b").unwrap(), None);

        // Replacing an existing key only counts the new value
        storage.set_item("a", "123456789").unwrap();
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested")).unwrap();

        assert_eq!(storage.get_item("site_data").unwrap(), None);
        storage.set_item("site_data", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get_item("site_data").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        let reopened = FileStorage::open(storage.dir()).unwrap();
        assert!(reopened.get_item("site_data").unwrap().is_some());

        reopened.remove_item("site_data").unwrap();
        reopened.remove_item("site_data").unwrap();
        assert_eq!(storage.get_item("site_data").unwrap(), None);
    }

    #[test]
    fn test_file_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get_item(".hidden"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
