//! Persisted notification ledger for the Beacon channel.
//!
//! The [`NotificationStore`] holds the process-wide, newest-first list of
//! user-facing notifications, persists it to a [`Storage`] backend with a
//! two-tier trim-on-pressure policy, and requests best-effort presentation
//! side effects ([`StoreAction`]) without ever failing its caller.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod notification;
mod store;
pub mod storage;

pub use notification::{Notification, NotificationDraft, NotificationKind};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use store::{
    DEFAULT_MAX_NOTIFICATIONS, DEFAULT_PRESSURE_THRESHOLD, DEFAULT_PRESSURE_TRIM_LEN,
    DEFAULT_QUOTA_TRIM_LEN, DEFAULT_STORAGE_KEY, NotificationStore, StoreAction, StoreConfig,
};
