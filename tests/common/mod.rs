//! Common test utilities

#![allow(dead_code)]

use chrono::NaiveDate;
use jurisfinance::store::{FileStore, MemoryStore};
use jurisfinance::DataStore;

/// Reference date for deterministic status calculations: two seeded
/// installments paid, the third not yet due.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date")
}

/// Fresh in-memory store seeded with the built-in sample data.
pub fn memory_store() -> DataStore {
    DataStore::load_with_today(Box::new(MemoryStore::new()), today())
}

/// Store backed by files inside a temp directory. The directory guard must
/// outlive the store.
pub fn file_store(dir: &tempfile::TempDir) -> DataStore {
    let backend = FileStore::open(dir.path()).expect("failed to open file store");
    DataStore::load_with_today(Box::new(backend), today())
}
