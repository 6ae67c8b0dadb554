//! Key-value persistence seam under the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Production uses the browser's `localStorage` (implemented in the client
//! crate); tests and non-browser builds use [`MemoryStorage`]. Both are
//! synchronous, so a write is visible to the next read in the same tab.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Failure reported by a [`Storage`] backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backing store cannot be reached (no window, storage disabled).
    #[error("storage unavailable")]
    Unavailable,
    /// A write was refused (quota exceeded, private mode, ...).
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
    /// A delete was refused.
    #[error("failed to remove {key}: {reason}")]
    Remove { key: String, reason: String },
}

/// Minimal string key-value store.
///
/// Implementations must be cheap to share: the registry hands the same
/// backend to every namespace.
pub trait Storage: Send + Sync {
    /// Read the raw value for `key`, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend refuses the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend refuses the delete.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process [`Storage`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored, across all namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
