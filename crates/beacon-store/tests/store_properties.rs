//! Property tests for the notification ledger.
//!
//! Arbitrary mutation sequences must keep the list within its cap, keep
//! ids unique, and keep the unread count equal to the number of unread
//! entries.

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use beacon_core::Environment;
use beacon_store::{
    MemoryStorage, NotificationDraft, NotificationKind, NotificationStore, StoreConfig,
};
use chrono::Utc;
use proptest::prelude::*;

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
        for (byte, source) in buffer.iter_mut().zip(next.to_be_bytes().iter().cycle()) {
            *byte = *source;
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    MarkRead(usize),
    MarkAllRead,
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => Just(Op::Add),
        2 => (0usize..8).prop_map(Op::MarkRead),
        1 => Just(Op::MarkAllRead),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn mutations_preserve_ledger_invariants(
        max in 1usize..12,
        ops in proptest::collection::vec(op_strategy(), 0..60),
    ) {
        let config = StoreConfig { max_notifications: max, ..StoreConfig::default() };
        let mut store = NotificationStore::new(MemoryStorage::new(), SeqEnv::default(), config);
        let mut issued = HashSet::new();

        for op in ops {
            match op {
                Op::Add => {
                    let id = store.add_notification(
                        NotificationDraft::new(NotificationKind::Info, "t", "m"),
                        Utc::now(),
                    );
                    prop_assert_eq!(store.notifications()[0].id.as_str(), id.as_str());
                    prop_assert!(issued.insert(id), "id reused");
                },
                Op::MarkRead(index) => {
                    let id = store.notifications().get(index).map(|n| n.id.clone());
                    if let Some(id) = id {
                        store.mark_as_read(&id);
                    }
                },
                Op::MarkAllRead => store.mark_all_as_read(),
                Op::Clear => store.clear_notifications(),
            }

            prop_assert!(store.notifications().len() <= max);
            let unread = store.notifications().iter().filter(|n| !n.read).count();
            prop_assert_eq!(store.unread_count(), unread);

            let distinct: HashSet<_> =
                store.notifications().iter().map(|n| n.id.as_str()).collect();
            prop_assert_eq!(distinct.len(), store.notifications().len());
        }
    }
}
