//! End-to-end bridge scenarios.
//!
//! Drives the bridge the way the runtime would (transport callbacks plus
//! pump cycles) and checks the externally visible guarantees: offline
//! sends replay exactly once, the ledger caps at its maximum, intentional
//! disconnects stay silent, and the retry budget settles at disconnected.

use std::time::{Duration, Instant};

use beacon_app::{AppEvent, Bridge};
use beacon_client::{ChannelAction, ChannelConfig};
use beacon_core::{BackoffConfig, ConnectionStatus, Environment};
use beacon_proto::ChannelMessage;
use beacon_store::{MemoryStorage, StoreConfig};
use chrono::Utc;

#[derive(Clone)]
struct TestEnv;

impl Environment for TestEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = i as u8;
        }
    }
}

fn channel_config() -> ChannelConfig {
    ChannelConfig {
        backoff: BackoffConfig { max_jitter: Duration::ZERO, ..BackoffConfig::default() },
        ..ChannelConfig::new("wss://push.example/channel")
    }
}

fn bridge() -> Bridge<MemoryStorage, TestEnv> {
    Bridge::new(TestEnv, channel_config(), MemoryStorage::new(), StoreConfig::default())
}

fn transmitted_kinds(bridge: &mut Bridge<MemoryStorage, TestEnv>) -> Vec<String> {
    bridge
        .take_channel_actions()
        .into_iter()
        .filter_map(|action| match action {
            ChannelAction::Transmit(message) => Some(message.kind),
            _ => None,
        })
        .collect()
}

#[test]
fn offline_sends_replay_exactly_once_across_reconnects() {
    let mut bridge = bridge();
    let t0 = Instant::now();

    assert!(!bridge.send(ChannelMessage::new("x")));
    assert!(!bridge.send(ChannelMessage::new("x")));

    bridge.connect(t0);
    let _ = bridge.take_channel_actions();
    bridge.transport_opened(t0);
    assert_eq!(transmitted_kinds(&mut bridge), ["x", "x"]);

    // A drop and reconnect must not replay them again.
    bridge.transport_closed(t0);
    bridge.handle_tick(t0 + Duration::from_secs(2));
    let _ = bridge.take_channel_actions();
    bridge.transport_opened(t0 + Duration::from_secs(2));
    assert!(transmitted_kinds(&mut bridge).is_empty());
}

#[test]
fn ledger_caps_at_configured_maximum() {
    let mut bridge = bridge();
    let t0 = Instant::now();
    bridge.connect(t0);
    bridge.transport_opened(t0);
    let _ = bridge.pump(Utc::now());

    for n in 0..60 {
        bridge.message_received(&format!(
            r#"{{"type":"notification:new","data":{{"title":"n{n}","message":"m"}}}}"#
        ));
    }
    let _ = bridge.pump(Utc::now());

    assert_eq!(bridge.notifications().len(), 50);
    assert_eq!(bridge.notifications()[0].title, "n59");
    assert_eq!(bridge.notifications()[49].title, "n10");
    assert_eq!(bridge.unread_count(), 50);
}

#[test]
fn disconnect_while_retry_pending_stays_silent() {
    let mut bridge = bridge();
    let t0 = Instant::now();
    bridge.connect(t0);
    bridge.transport_opened(t0);
    bridge.transport_closed(t0);
    let _ = bridge.take_channel_actions();
    assert_eq!(bridge.status(), ConnectionStatus::Reconnecting);

    bridge.disconnect();
    let _ = bridge.take_channel_actions();

    bridge.handle_tick(t0 + Duration::from_secs(300));
    assert!(bridge.take_channel_actions().is_empty());
    assert_eq!(bridge.status(), ConnectionStatus::Disconnected);
}

#[test]
fn retry_budget_exhaustion_settles_disconnected() {
    let mut bridge = Bridge::new(
        TestEnv,
        ChannelConfig { max_reconnect_attempts: 3, ..channel_config() },
        MemoryStorage::new(),
        StoreConfig::default(),
    );
    let mut now = Instant::now();
    bridge.connect(now);
    let _ = bridge.take_channel_actions();

    for _ in 0..3 {
        bridge.transport_closed(now);
        assert_eq!(bridge.status(), ConnectionStatus::Reconnecting);
        now += Duration::from_secs(60);
        bridge.handle_tick(now);
        let _ = bridge.take_channel_actions();
    }

    bridge.transport_closed(now);
    assert_eq!(bridge.status(), ConnectionStatus::Disconnected);

    // Manual reconnect starts a fresh budget.
    bridge.connect(now);
    assert_eq!(bridge.status(), ConnectionStatus::Connecting);
    assert_eq!(bridge.take_channel_actions().len(), 1);
}

#[test]
fn status_journey_reaches_the_app_in_order() {
    let mut bridge = bridge();
    let t0 = Instant::now();

    bridge.connect(t0);
    bridge.transport_opened(t0);
    bridge.transport_closed(t0);

    let statuses: Vec<ConnectionStatus> = bridge
        .pump(Utc::now())
        .into_iter()
        .filter_map(|event| match event {
            AppEvent::StatusChanged(status) => Some(status),
            _ => None,
        })
        .collect();

    assert_eq!(statuses, [
        ConnectionStatus::Disconnected, // current status at subscription
        ConnectionStatus::Connecting,
        ConnectionStatus::Connected,
        ConnectionStatus::Reconnecting,
    ]);
}
