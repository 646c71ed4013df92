//! Notification store.
//!
//! Process-wide ledger of user-facing notifications, fed by the channel,
//! persisted across reloads, and exposed to presentation layers. All
//! failure is absorbed: storage trouble degrades to trimming and logs,
//! never to an error at the public API.

use beacon_core::Environment;
use chrono::{DateTime, Utc};

use crate::{
    notification::{Notification, NotificationDraft},
    storage::{Storage, StorageError},
};

/// Default cap on retained notifications.
pub const DEFAULT_MAX_NOTIFICATIONS: usize = 50;

/// Storage key the list persists under.
pub const DEFAULT_STORAGE_KEY: &str = "beacon.notifications";

/// Usage fraction past which the store trims proactively before writing.
pub const DEFAULT_PRESSURE_THRESHOLD: f64 = 0.8;

/// Entries kept by the proactive pressure trim.
pub const DEFAULT_PRESSURE_TRIM_LEN: usize = 20;

/// Entries kept by the trim after a rejected write.
pub const DEFAULT_QUOTA_TRIM_LEN: usize = 10;

/// Store configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Cap on retained notifications; oldest dropped past it.
    pub max_notifications: usize,
    /// Storage key for the persisted list.
    pub storage_key: String,
    /// Usage fraction that triggers the proactive trim.
    pub pressure_threshold: f64,
    /// Entries kept by the proactive trim.
    pub pressure_trim_len: usize,
    /// Entries kept when a write was rejected outright.
    pub quota_trim_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_notifications: DEFAULT_MAX_NOTIFICATIONS,
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            pressure_threshold: DEFAULT_PRESSURE_THRESHOLD,
            pressure_trim_len: DEFAULT_PRESSURE_TRIM_LEN,
            quota_trim_len: DEFAULT_QUOTA_TRIM_LEN,
        }
    }
}

/// Best-effort presentation side effects requested by the store.
///
/// The runtime executes each inside a try-log-continue boundary; a denied
/// permission or unsupported platform is expected, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Play the notification audio cue.
    PlayCue,
    /// Raise a platform-level notification.
    Announce {
        /// Short heading.
        title: String,
        /// Body text.
        message: String,
    },
}

/// Persisted notification ledger.
///
/// Newest-first by insertion; `unread_count` is recomputed from the list
/// on every read so it cannot drift.
pub struct NotificationStore<S: Storage, E: Environment> {
    storage: S,
    env: E,
    config: StoreConfig,
    notifications: Vec<Notification>,
    /// Disambiguates ids created within one clock millisecond.
    sequence: u64,
    actions: Vec<StoreAction>,
}

impl<S: Storage, E: Environment> NotificationStore<S, E> {
    /// Create a store backed by the given storage, loading any persisted
    /// list. Absent or malformed stored data falls back to an empty list.
    pub fn new(storage: S, env: E, config: StoreConfig) -> Self {
        let mut store = Self {
            storage,
            env,
            config,
            notifications: Vec::new(),
            sequence: 0,
            actions: Vec::new(),
        };
        store.load();
        store
    }

    /// Current list, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Count of unread entries, recomputed on every call.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Take the presentation side effects accumulated since the last call.
    pub fn take_actions(&mut self) -> Vec<StoreAction> {
        std::mem::take(&mut self.actions)
    }

    /// Add a notification.
    ///
    /// Assigns a fresh id and timestamp, marks it unread, prepends it,
    /// truncates to the configured maximum, persists, and requests the
    /// audio cue and platform announcement. Returns the assigned id.
    pub fn add_notification(&mut self, draft: NotificationDraft, now: DateTime<Utc>) -> String {
        let id = self.generate_id(now);
        let notification = Notification {
            id: id.clone(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            timestamp: now,
            read: false,
            data: draft.data,
        };

        self.notifications.insert(0, notification);
        self.notifications.truncate(self.config.max_notifications);

        self.actions.push(StoreAction::PlayCue);
        if let Some(newest) = self.notifications.first() {
            self.actions.push(StoreAction::Announce {
                title: newest.title.clone(),
                message: newest.message.clone(),
            });
        }

        self.persist();
        id
    }

    /// Mark one entry read. Returns whether anything changed; unknown or
    /// already-read ids are a no-op.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        let Some(entry) = self.notifications.iter_mut().find(|n| n.id == id && !n.read) else {
            return false;
        };
        entry.read = true;
        self.persist();
        true
    }

    /// Mark every entry read.
    pub fn mark_all_as_read(&mut self) {
        let mut changed = false;
        for entry in &mut self.notifications {
            changed |= !entry.read;
            entry.read = true;
        }
        if changed {
            self.persist();
        }
    }

    /// Empty the list.
    pub fn clear_notifications(&mut self) {
        if self.notifications.is_empty() {
            return;
        }
        self.notifications.clear();
        self.persist();
    }

    /// Reload the list from storage, replacing in-memory state. Absent or
    /// malformed data falls back to an empty list.
    pub fn load(&mut self) {
        self.notifications = match self.storage.get(&self.config.storage_key) {
            Ok(Some(encoded)) => match serde_json::from_str::<Vec<Notification>>(&encoded) {
                Ok(list) => list,
                Err(err) => {
                    tracing::warn!(%err, "persisted notifications malformed; starting empty");
                    Vec::new()
                },
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "failed to read persisted notifications; starting empty");
                Vec::new()
            },
        };
        self.notifications.truncate(self.config.max_notifications);
    }

    /// Monotonic sequence plus entropy: the sequence keeps ids unique
    /// within one run even at millisecond collisions, the entropy keeps
    /// them unique across reloads.
    fn generate_id(&mut self, now: DateTime<Utc>) -> String {
        let suffix = self.env.random_u64() ^ self.sequence.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        self.sequence = self.sequence.wrapping_add(1);
        format!("{}-{suffix:016x}", now.timestamp_millis())
    }

    /// Persist the list, degrading by trimming instead of failing.
    ///
    /// Two tiers: approaching-capacity storage triggers a proactive trim
    /// before the write; an outright quota rejection trims harder and
    /// retries once. Anything still failing is logged and dropped.
    fn persist(&mut self) {
        if self.under_pressure() {
            tracing::info!(
                keep = self.config.pressure_trim_len,
                "storage near capacity; trimming notification list"
            );
            self.notifications.truncate(self.config.pressure_trim_len);
        }

        match self.write() {
            Ok(()) => {},
            Err(StorageError::QuotaExceeded { .. }) => {
                self.notifications.truncate(self.config.quota_trim_len);
                if let Err(err) = self.write() {
                    tracing::warn!(%err, "notification persist failed after trim; giving up");
                }
            },
            Err(err) => {
                tracing::warn!(%err, "notification persist failed");
            },
        }
    }

    fn write(&self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.notifications)?;
        self.storage.put(&self.config.storage_key, &encoded)
    }

    fn under_pressure(&self) -> bool {
        let capacity = self.storage.capacity();
        if capacity == 0 {
            return false;
        }
        match self.storage.usage() {
            Ok(used) => used as f64 / capacity as f64 >= self.config.pressure_threshold,
            Err(err) => {
                tracing::debug!(%err, "storage usage unavailable; skipping pressure check");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        time::Duration,
    };

    use serde_json::json;

    use super::*;
    use crate::{NotificationKind, storage::MemoryStorage};

    /// Deterministic entropy that still varies between calls.
    #[derive(Clone, Default)]
    struct SeqEnv {
        counter: Arc<AtomicU64>,
    }

    impl Environment for SeqEnv {
        type Instant = std::time::Instant;

        fn now(&self) -> Self::Instant {
            std::time::Instant::now()
        }

        fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
            async {}
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let next = self.counter.fetch_add(1, Ordering::SeqCst);
            for (i, byte) in buffer.iter_mut().enumerate() {
                *byte = (next as u8).wrapping_add(i as u8);
            }
        }
    }

    fn store_with(
        storage: MemoryStorage,
        config: StoreConfig,
    ) -> NotificationStore<MemoryStorage, SeqEnv> {
        NotificationStore::new(storage, SeqEnv::default(), config)
    }

    fn store() -> NotificationStore<MemoryStorage, SeqEnv> {
        store_with(MemoryStorage::new(), StoreConfig::default())
    }

    fn draft(n: usize) -> NotificationDraft {
        NotificationDraft::new(NotificationKind::Info, format!("title {n}"), format!("body {n}"))
    }

    #[test]
    fn add_prepends_and_assigns_unique_ids() {
        let mut store = store();
        let now = Utc::now();

        let mut ids = HashSet::new();
        for n in 0..10 {
            let id = store.add_notification(draft(n), now);
            assert!(ids.insert(id), "duplicate id");
        }

        assert_eq!(store.notifications()[0].title, "title 9");
        assert_eq!(store.notifications()[9].title, "title 0");
        assert!(store.notifications().iter().all(|n| !n.read));
    }

    #[test]
    fn list_never_exceeds_maximum() {
        let mut store = store();
        let now = Utc::now();

        for n in 0..60 {
            store.add_notification(draft(n), now);
            assert!(store.notifications().len() <= DEFAULT_MAX_NOTIFICATIONS);
        }

        // The 50 most recent survive, oldest dropped.
        assert_eq!(store.notifications().len(), 50);
        assert_eq!(store.notifications()[0].title, "title 59");
        assert_eq!(store.notifications()[49].title, "title 10");
    }

    #[test]
    fn unread_count_tracks_read_flags() {
        let mut store = store();
        let now = Utc::now();

        let first = store.add_notification(draft(0), now);
        store.add_notification(draft(1), now);
        assert_eq!(store.unread_count(), 2);

        assert!(store.mark_as_read(&first));
        assert_eq!(store.unread_count(), 1);

        // Unknown and repeated ids change nothing.
        assert!(!store.mark_as_read(&first));
        assert!(!store.mark_as_read("missing"));
        assert_eq!(store.unread_count(), 1);

        store.mark_all_as_read();
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn clear_empties_the_list_and_storage() {
        let storage = MemoryStorage::new();
        let mut store = store_with(storage.clone(), StoreConfig::default());
        store.add_notification(draft(0), Utc::now());

        store.clear_notifications();
        assert!(store.notifications().is_empty());

        let reloaded = store_with(storage, StoreConfig::default());
        assert!(reloaded.notifications().is_empty());
    }

    #[test]
    fn list_survives_reload() {
        let storage = MemoryStorage::new();
        let now = Utc::now();

        let mut store = store_with(storage.clone(), StoreConfig::default());
        store.add_notification(draft(0), now);
        store.add_notification(draft(1), now);
        drop(store);

        let reloaded = store_with(storage, StoreConfig::default());
        assert_eq!(reloaded.notifications().len(), 2);
        assert_eq!(reloaded.notifications()[0].title, "title 1");
        assert_eq!(reloaded.unread_count(), 2);
    }

    #[test]
    fn malformed_persisted_data_falls_back_to_empty() {
        let storage = MemoryStorage::new();
        storage.put(DEFAULT_STORAGE_KEY, "{not json").unwrap();

        let store = store_with(storage, StoreConfig::default());
        assert!(store.notifications().is_empty());
    }

    #[test]
    fn add_requests_cue_and_announcement() {
        let mut store = store();
        store.add_notification(
            NotificationDraft::new(NotificationKind::Booking, "Booking", "From Ada")
                .with_data(json!({ "name": "Ada" })),
            Utc::now(),
        );

        assert_eq!(store.take_actions(), [
            StoreAction::PlayCue,
            StoreAction::Announce { title: "Booking".to_owned(), message: "From Ada".to_owned() },
        ]);
        assert!(store.take_actions().is_empty());
    }

    #[test]
    fn storage_pressure_trims_proactively() {
        let storage = MemoryStorage::with_capacity(10_000);
        storage.put("ballast", &"x".repeat(8_100)).unwrap();

        let config = StoreConfig { pressure_trim_len: 3, ..StoreConfig::default() };
        let mut store = store_with(storage, config);

        for n in 0..6 {
            store.add_notification(draft(n), Utc::now());
        }

        assert_eq!(store.notifications().len(), 3);
        assert_eq!(store.notifications()[0].title, "title 5");
    }

    #[test]
    fn rejected_write_trims_and_retries_once() {
        let storage = MemoryStorage::with_capacity(1_300);
        let config = StoreConfig {
            // Disable the proactive tier so only the rejection path runs.
            pressure_threshold: 2.0,
            quota_trim_len: 1,
            ..StoreConfig::default()
        };
        let mut store = store_with(storage.clone(), config.clone());

        let big = |n: usize| {
            NotificationDraft::new(NotificationKind::Info, format!("title {n}"), "x".repeat(400))
        };
        for n in 0..3 {
            store.add_notification(big(n), Utc::now());
        }

        // The third write blew the quota; the newest entry survives.
        assert_eq!(store.notifications().len(), 1);
        assert_eq!(store.notifications()[0].title, "title 2");

        let reloaded = store_with(storage, config);
        assert_eq!(reloaded.notifications().len(), 1);
        assert_eq!(reloaded.notifications()[0].title, "title 2");
    }
}
