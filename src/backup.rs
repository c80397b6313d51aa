//! Backup export and import
//!
//! A backup is a single JSON object mapping every application-prefixed
//! storage key to its parsed value. Import replaces the entire stored state
//! with the file's contents after validating that it really is one of our
//! backups; it never merges.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::store::{keys, KeyStore, StorageError};

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Backup is not a JSON object")]
    Malformed(#[source] serde_json::Error),

    #[error("Backup contains no data")]
    Empty,

    #[error("Backup contains foreign key {0:?}")]
    ForeignKey(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Serialize everything stored under the application prefix into one
/// pretty-printed JSON document.
pub fn export_state(backend: &dyn KeyStore) -> Result<String, BackupError> {
    let mut snapshot = BTreeMap::new();
    for key in backend.keys()? {
        if !key.starts_with(keys::PREFIX) {
            continue;
        }
        let Some(raw) = backend.get(&key)? else {
            continue;
        };
        let value: Value = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: key.clone(),
            source,
        })?;
        snapshot.insert(key, value);
    }
    if snapshot.is_empty() {
        return Err(BackupError::Empty);
    }
    // BTreeMap keeps key order stable across exports
    serde_json::to_string_pretty(&snapshot).map_err(|source| {
        BackupError::Storage(StorageError::Serialize {
            key: keys::PREFIX.to_string(),
            source,
        })
    })
}

/// Validate a backup document and replace the stored state with it.
///
/// All-or-nothing: validation happens before the first write, so a rejected
/// backup leaves the current state untouched. Keys present in the current
/// state but absent from the backup are removed.
pub fn import_state(backend: &mut dyn KeyStore, document: &str) -> Result<usize, BackupError> {
    let snapshot: BTreeMap<String, Value> =
        serde_json::from_str(document).map_err(BackupError::Malformed)?;

    if snapshot.is_empty() {
        return Err(BackupError::Empty);
    }
    for key in snapshot.keys() {
        if !key.starts_with(keys::PREFIX) {
            return Err(BackupError::ForeignKey(key.clone()));
        }
    }

    for key in backend.keys()? {
        if key.starts_with(keys::PREFIX) && !snapshot.contains_key(&key) {
            backend.remove(&key)?;
        }
    }
    for (key, value) in &snapshot {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.clone(),
            source,
        })?;
        backend.put(key, &raw)?;
    }

    tracing::info!(entries = snapshot.len(), "State imported from backup");
    Ok(snapshot.len())
}
