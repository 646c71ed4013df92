//! Storage abstraction for the notification ledger.
//!
//! This module provides a trait-based abstraction for persisting the
//! notification list across reloads. The trait is synchronous (no async)
//! to keep the store free of I/O scheduling concerns.

mod error;
mod memory;

pub use error::StorageError;
pub use memory::MemoryStorage;

/// Key-value storage with a byte budget.
///
/// Models durable client storage: a flat string-keyed map with a small
/// practical capacity (around 5 MB) shared with other persisted state.
///
/// This trait must be:
/// - Clone: can be handed to multiple consumers
/// - Send + Sync: thread-safe for concurrent access
/// - Synchronous: no async methods
///
/// # Clone Semantics
///
/// Implementations typically share internal state via Arc, meaning clones
/// access the same underlying storage.
pub trait Storage: Clone + Send + Sync + 'static {
    /// Store a value under the given key, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] when the write would push
    /// total usage past the capacity; the previous value for the key is
    /// left intact in that case.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Read the value stored under the key, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Remove the key. Absent keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Total bytes currently stored across all keys.
    fn usage(&self) -> Result<u64, StorageError>;

    /// Storage budget in bytes.
    fn capacity(&self) -> u64;
}
