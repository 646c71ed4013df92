//! In-memory storage backend.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use super::{Storage, StorageError};

/// Default byte budget, matching the practical budget of durable client
/// storage.
pub const DEFAULT_CAPACITY: u64 = 5 * 1024 * 1024;

/// In-memory key-value storage with a configurable byte budget.
///
/// The production backend for tests and for runtimes without durable
/// storage. Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    capacity: u64,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MemoryStorage {
    /// Storage with the default budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage with an explicit byte budget. Tests use tiny budgets to
    /// exercise the quota path.
    #[must_use]
    pub fn with_capacity(capacity: u64) -> Self {
        Self { entries: Arc::new(Mutex::new(HashMap::new())), capacity }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Recover from a poisoned lock; the map itself stays consistent
        // because every mutation is a single insert or remove.
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn used(entries: &HashMap<String, String>) -> u64 {
        entries.iter().map(|(key, value)| (key.len() + value.len()) as u64).sum()
    }
}

impl Storage for MemoryStorage {
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();

        let replaced = entries.get(key).map_or(0, |existing| (key.len() + existing.len()) as u64);
        let used = Self::used(&entries) - replaced;
        let attempted = (key.len() + value.len()) as u64;
        let available = self.capacity.saturating_sub(used);

        if attempted > available {
            return Err(StorageError::QuotaExceeded { attempted, available });
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }

    fn usage(&self) -> Result<u64, StorageError> {
        Ok(Self::used(&self.entries()))
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }
}
