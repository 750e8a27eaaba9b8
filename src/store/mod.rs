//! Host key-value storage for the persisted link collection.
//!
//! The registry never talks to the filesystem directly. It reads and writes
//! whole documents under fixed keys through [`KeyValueStore`], so the same
//! registry logic runs against the in-memory store in tests and the
//! file-backed store in production.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Synchronous string-to-string storage. Every call completes immediately;
/// there is no versioning, so concurrent writers are last-writer-wins.
pub trait KeyValueStore: Send + Sync {
    /// Returns the document stored under `key`, or `None` if nothing was
    /// ever written there.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the document stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
