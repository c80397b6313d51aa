//! Keyed persistence backend
//!
//! The store persists one JSON blob per key, namespaced by the application
//! prefix. [`FileStore`] keeps one file per key in a data directory;
//! [`MemoryStore`] backs tests. There is no incremental format: every write
//! replaces the whole value.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::StorageError;

/// Persistent store key names. One JSON blob lives under each.
pub mod keys {
    pub const PREFIX: &str = "jurisfinance_";

    pub const DEBTORS: &str = "jurisfinance_debtors";
    pub const AGREEMENTS: &str = "jurisfinance_debtorAgreements";
    pub const SETTINGS: &str = "jurisfinance_settings";
    pub const CHAT_HISTORY: &str = "jurisfinance_aiChatHistory";
    pub const AUTHENTICATED: &str = "jurisfinance_isAuthenticated";
    pub const JOBS: &str = "jurisfinance_jobs";
    pub const CASES: &str = "jurisfinance_cases";
    pub const TASKS: &str = "jurisfinance_tasks";
    pub const APPOINTMENTS: &str = "jurisfinance_appointments";
    pub const CONTRACTS: &str = "jurisfinance_contracts";
    pub const DRAFT_NOTES: &str = "jurisfinance_draftNotes";
}

/// Synchronous keyed blob storage.
///
/// Writes are fire-and-forget from the caller's perspective: there is no
/// batching, no acknowledgement protocol and no retry. A single logical
/// writer owns the store.
pub trait KeyStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    /// All keys currently present, sorted.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

// =========================================================================
// FileStore
// =========================================================================

/// One `<key>.json` file per key inside a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a file store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| StorageError::Io {
            key: self.dir.display().to_string(),
            source,
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StorageError::Io {
                key: self.dir.display().to_string(),
                source,
            })?;
            let name = entry.file_name();
            if let Some(key) = name.to_string_lossy().strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

// =========================================================================
// MemoryStore
// =========================================================================

/// In-memory backend for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}
