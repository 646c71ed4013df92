//! Channel-to-application translation layer.
//!
//! The [`Bridge`] owns the [`Channel`] and the [`NotificationStore`] and
//! adapts them to the application lifecycle.
//!
//! # Responsibilities
//!
//! - Subscribes to the channel's application events (`booking:new`,
//!   `notification:new`, `metrics:update`, `error`) and its status, and
//!   translates them into notifications and [`crate::AppEvent`]s.
//! - Accumulates outgoing [`ChannelAction`]s and [`StoreAction`]s for the
//!   driver to execute in the next I/O cycle.
//! - Tears down subscriptions and the connection when the application
//!   unmounts.
//!
//! Channel subscribers run synchronously inside channel calls, so they
//! cannot touch the store directly (the bridge owns both). They forward
//! into an inbox instead, which [`Bridge::pump`] drains between cycles.

use beacon_client::{Channel, ChannelAction, ChannelConfig, SubscriptionId};
use beacon_core::{ChannelError, ConnectionStatus, Environment};
use beacon_proto::{ChannelMessage, EVENT_ERROR};
use beacon_store::{NotificationDraft, NotificationStore, Storage, StoreAction, StoreConfig};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::AppEvent;

/// Application events the bridge subscribes to on the channel.
const SUBSCRIBED_EVENTS: [&str; 4] =
    ["booking:new", "notification:new", "metrics:update", EVENT_ERROR];

enum Inbound {
    Message(ChannelMessage),
    Status(ConnectionStatus),
}

/// Bridge between the application and the channel/store pair.
///
/// Generic over [`Storage`] and [`Environment`] so the same wiring runs in
/// production and in deterministic tests.
pub struct Bridge<S: Storage, E: Environment> {
    channel: Channel<E>,
    store: NotificationStore<S, E>,
    inbox: mpsc::UnboundedReceiver<Inbound>,
    subscriptions: Vec<SubscriptionId>,
}

impl<S: Storage, E: Environment> Bridge<S, E> {
    /// Create a bridge, wiring the channel's events into the store.
    pub fn new(
        env: E,
        channel_config: ChannelConfig,
        storage: S,
        store_config: StoreConfig,
    ) -> Self {
        let mut channel = Channel::new(env.clone(), channel_config);
        let store = NotificationStore::new(storage, env, store_config);

        let (sender, inbox) = mpsc::unbounded_channel();
        let mut subscriptions = Vec::new();

        for kind in SUBSCRIBED_EVENTS {
            let sender = sender.clone();
            subscriptions.push(channel.on(kind, move |message| {
                let _ = sender.send(Inbound::Message(message.clone()));
            }));
        }
        subscriptions.push(channel.on_status_change(move |status| {
            let _ = sender.send(Inbound::Status(status));
        }));

        Self { channel, store, inbox, subscriptions }
    }

    /// Begin connecting.
    pub fn connect(&mut self, now: E::Instant) {
        self.channel.connect(now);
    }

    /// Close intentionally; no automatic reconnection afterwards.
    pub fn disconnect(&mut self) {
        self.channel.disconnect();
    }

    /// Send a message through the channel (queued while offline).
    pub fn send(&mut self, message: ChannelMessage) -> bool {
        self.channel.send(message)
    }

    /// Process a time tick (reconnect timers, heartbeat).
    pub fn handle_tick(&mut self, now: E::Instant) {
        self.channel.tick(now);
    }

    /// The driver opened the transport.
    pub fn transport_opened(&mut self, now: E::Instant) {
        self.channel.transport_opened(now);
    }

    /// The driver observed the transport closing.
    pub fn transport_closed(&mut self, now: E::Instant) {
        self.channel.transport_closed(now);
    }

    /// The driver observed a transport failure.
    pub fn transport_errored(&mut self, reason: &str, now: E::Instant) {
        self.channel.transport_errored(ChannelError::Transport(reason.to_owned()), now);
    }

    /// Inbound text from the transport.
    pub fn message_received(&mut self, text: &str) {
        self.channel.message_received(text);
    }

    /// Drain subscriber activity accumulated since the last cycle into
    /// application events, feeding the store along the way.
    ///
    /// `metrics:update` is observation-only: logged, never a notification.
    pub fn pump(&mut self, now: DateTime<Utc>) -> Vec<AppEvent> {
        let mut events = Vec::new();

        while let Ok(inbound) = self.inbox.try_recv() {
            match inbound {
                Inbound::Status(status) => {
                    events.push(AppEvent::StatusChanged(status));
                },
                Inbound::Message(message) => {
                    if message.kind == "metrics:update" {
                        tracing::debug!(data = ?message.data, "metrics update observed");
                        continue;
                    }
                    if message.kind == EVENT_ERROR {
                        events.push(AppEvent::Error { message: error_text(&message) });
                    }
                    if let Some(draft) = NotificationDraft::from_channel_message(&message) {
                        self.store.add_notification(draft, now);
                        events.push(AppEvent::UnreadChanged(self.store.unread_count()));
                    }
                },
            }
        }

        events
    }

    /// Take pending channel actions for the driver.
    pub fn take_channel_actions(&mut self) -> Vec<ChannelAction> {
        self.channel.take_actions()
    }

    /// Take pending presentation side effects for the driver.
    pub fn take_store_actions(&mut self) -> Vec<StoreAction> {
        self.store.take_actions()
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.channel.status()
    }

    /// The notification ledger, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[beacon_store::Notification] {
        self.store.notifications()
    }

    /// Unread badge count.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    /// Mark one notification read. Returns whether anything changed.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        self.store.mark_as_read(id)
    }

    /// Mark every notification read.
    pub fn mark_all_as_read(&mut self) {
        self.store.mark_all_as_read();
    }

    /// Empty the notification ledger.
    pub fn clear_notifications(&mut self) {
        self.store.clear_notifications();
    }

    /// Unmount: drop all channel subscriptions and close the connection.
    pub fn teardown(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.channel.unsubscribe(id);
        }
        self.channel.disconnect();
    }
}

fn error_text(message: &ChannelMessage) -> String {
    message
        .data
        .as_ref()
        .and_then(|data| data.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("channel error")
        .to_owned()
}
