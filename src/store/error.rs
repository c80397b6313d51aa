//! Storage Error Types

use thiserror::Error;

/// Errors raised by the keyed persistence backend and snapshot writes.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O failure on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt data under key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize snapshot for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
