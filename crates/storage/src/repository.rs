use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable key/value slots holding text values.
///
/// Each key holds at most one value; writes overwrite.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. An empty slot is `Ok(None)`.
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the removal.
    async fn remove_slot(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory slot store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySlotStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySlotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl SlotStore for InMemorySlotStore {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_slot(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Storage backend behind a trait object so callers can swap in-memory and `SQLite`.
#[derive(Clone)]
pub struct Storage {
    pub slots: Arc<dyn SlotStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let slots: Arc<dyn SlotStore> = Arc::new(InMemorySlotStore::new());
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_overwrites_and_remove_is_idempotent() {
        let store = InMemorySlotStore::new();
        assert_eq!(store.read_slot("k").await.unwrap(), None);

        store.write_slot("k", "first").await.unwrap();
        store.write_slot("k", "second").await.unwrap();
        assert_eq!(store.read_slot("k").await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.len().unwrap(), 1);

        store.remove_slot("k").await.unwrap();
        store.remove_slot("k").await.unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn storage_in_memory_shares_one_backend() {
        let storage = Storage::in_memory();
        let clone = storage.clone();
        storage.slots.write_slot("a", "1").await.unwrap();
        assert_eq!(clone.slots.read_slot("a").await.unwrap().as_deref(), Some("1"));
    }
}
