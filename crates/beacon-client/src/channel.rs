//! Channel state machine.
//!
//! The `Channel` owns at most one logical connection to the push endpoint,
//! abstracting reconnection, liveness, and outbound buffering away from
//! consumers. It is a pure state machine: methods take time as input and
//! accumulate [`ChannelAction`]s for the driver to execute.
//!
//! # State Machine
//!
//! ```text
//!                connect()              transport opens
//! ┌──────────────┐ ────────> ┌────────────┐ ────────> ┌───────────┐
//! │ Disconnected │           │ Connecting │           │ Connected │
//! └──────────────┘ <──────── └────────────┘           └───────────┘
//!        ^          disconnect() /                          │
//!        │          budget exhausted                        │ close (unintentional)
//!        │                                                  ↓
//!        │          retry succeeds                  ┌──────────────┐
//!        └───────────────────────────────────────── │ Reconnecting │
//!                                                   └──────────────┘
//! ```
//!
//! Transport errors move `Connecting`/`Connected` to `Error` and then
//! take the same path as an unintentional close (reconnect scheduled
//! while budget remains), so a failed open recovers even when no close
//! notification follows. `disconnect()` forces any state to
//! `Disconnected` and cancels all pending timers.

use std::time::Duration;

use beacon_core::{
    BackoffConfig, ChannelError, ConnectionStatus, DEFAULT_QUEUE_CAPACITY, Environment, SendQueue,
    backoff_delay, jitter,
};
use beacon_proto::{ChannelMessage, EVENT_CONNECTION_ESTABLISHED, EVENT_ERROR};
use serde_json::json;

use crate::{
    event::ChannelAction,
    subscribers::{Subscribers, SubscriptionId},
};

/// Default cap on consecutive reconnect attempts.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// Default heartbeat interval while connected.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Channel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Push endpoint URL.
    pub url: String,

    /// First-class disabled mode: when false, `connect()` settles at
    /// `Disconnected` and performs no network action. An escape hatch for
    /// runtimes without a push endpoint, not a failure.
    pub enabled: bool,

    /// Reconnect backoff schedule.
    pub backoff: BackoffConfig,

    /// Consecutive failed attempts tolerated before settling at
    /// `Disconnected`.
    pub max_reconnect_attempts: u32,

    /// Interval between outbound `ping` probes while connected. `None`
    /// disables the heartbeat.
    pub heartbeat_interval: Option<Duration>,

    /// Capacity of the offline send queue (drop-oldest on overflow).
    pub queue_capacity: usize,
}

impl ChannelConfig {
    /// Configuration for the given endpoint with default tuning.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            enabled: true,
            backoff: BackoffConfig::default(),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            heartbeat_interval: Some(DEFAULT_HEARTBEAT_INTERVAL),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new("")
    }
}

/// A reconnect attempt waiting for its backoff delay to elapse.
#[derive(Debug, Clone, Copy)]
struct PendingReconnect<I> {
    scheduled_at: I,
    delay: Duration,
}

/// Channel manager for the push endpoint.
///
/// Generic over [`Environment`] so tests can drive it with fixed instants
/// and seeded entropy. All operations run to completion synchronously;
/// "waiting" is represented by status, never by blocking a caller.
pub struct Channel<E: Environment> {
    env: E,
    config: ChannelConfig,
    status: ConnectionStatus,
    /// Set by `disconnect()`; suppresses automatic reconnection.
    intentional_close: bool,
    reconnect_attempts: u32,
    pending_reconnect: Option<PendingReconnect<E::Instant>>,
    last_heartbeat: Option<E::Instant>,
    queue: SendQueue,
    subscribers: Subscribers,
    actions: Vec<ChannelAction>,
}

impl<E: Environment> Channel<E> {
    /// Create a disconnected channel with the given configuration.
    pub fn new(env: E, config: ChannelConfig) -> Self {
        let queue = SendQueue::new(config.queue_capacity);
        Self {
            env,
            config,
            status: ConnectionStatus::Disconnected,
            intentional_close: false,
            reconnect_attempts: 0,
            pending_reconnect: None,
            last_heartbeat: None,
            queue,
            subscribers: Subscribers::default(),
            actions: Vec::new(),
        }
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// True only while the transport is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    /// Consecutive failed reconnect attempts since the last successful
    /// connection.
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    /// Number of messages waiting for a connection.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Take the actions accumulated since the last call.
    ///
    /// The driver executes these in order; the channel assumes they have
    /// been handed off once taken.
    pub fn take_actions(&mut self) -> Vec<ChannelAction> {
        std::mem::take(&mut self.actions)
    }

    /// Begin connecting. Idempotent: a no-op while `Connecting` or
    /// `Connected`.
    ///
    /// In disabled mode this settles at `Disconnected` without touching
    /// the network. Otherwise the retry budget is reset and the driver is
    /// asked to open the transport.
    pub fn connect(&mut self, _now: E::Instant) {
        if !self.config.enabled {
            self.set_status(ConnectionStatus::Disconnected);
            return;
        }

        if matches!(self.status, ConnectionStatus::Connecting | ConnectionStatus::Connected) {
            return;
        }

        self.intentional_close = false;
        self.reconnect_attempts = 0;
        self.pending_reconnect = None;
        self.set_status(ConnectionStatus::Connecting);
        self.actions.push(ChannelAction::OpenTransport { url: self.config.url.clone() });
    }

    /// Close intentionally. Cancels pending reconnect and heartbeat
    /// timers, closes the transport with a normal-closure code, and
    /// settles at `Disconnected`. No automatic reconnection fires
    /// afterwards.
    pub fn disconnect(&mut self) {
        self.intentional_close = true;
        self.pending_reconnect = None;
        self.last_heartbeat = None;

        if self.status != ConnectionStatus::Disconnected {
            self.actions.push(ChannelAction::CloseTransport);
        }
        self.set_status(ConnectionStatus::Disconnected);
    }

    /// Send a message, or queue it when the transport is not open.
    ///
    /// Returns `true` when the message was handed to the transport
    /// immediately. `false` means it was queued (subject to the
    /// drop-oldest policy) for replay after the next successful
    /// connection. Never blocks, never errors.
    pub fn send(&mut self, message: ChannelMessage) -> bool {
        if self.status == ConnectionStatus::Connected {
            self.actions.push(ChannelAction::Transmit(message));
            return true;
        }

        if let Some(dropped) = self.queue.push(message) {
            tracing::debug!(kind = %dropped.kind, "outbound queue full; dropped oldest message");
        }
        false
    }

    /// Register a handler for a named inbound event kind (plus the
    /// synthetic `connection:established` and `error` events).
    ///
    /// Multiple handlers per kind are allowed; delivery follows
    /// registration order, and a panicking handler does not prevent
    /// delivery to the rest. Remove with [`Channel::unsubscribe`].
    pub fn on(
        &mut self,
        kind: impl Into<String>,
        handler: impl FnMut(&ChannelMessage) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribers.add_event(kind, handler)
    }

    /// Register a status observer.
    ///
    /// The handler is immediately invoked once with the current status, so
    /// late subscribers never miss the state they joined in; afterwards it
    /// fires on every transition, synchronously, before the transitioning
    /// call returns.
    pub fn on_status_change(
        &mut self,
        handler: impl FnMut(ConnectionStatus) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.subscribers.add_status(handler);
        self.subscribers.notify_status_one(id, self.status);
        id
    }

    /// Remove the handler registered under this id. Idempotent; safe for
    /// stale ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.remove(id);
    }

    /// The transport opened successfully.
    ///
    /// Resets the retry budget, flushes the offline queue in enqueue order
    /// before any other post-connect side effect, then announces
    /// `connection:established` to subscribers and arms the heartbeat.
    ///
    /// Ignored unless an attempt is in flight; a transport that opens
    /// after `disconnect()` is stale and the driver tears it down.
    pub fn transport_opened(&mut self, now: E::Instant) {
        if !matches!(self.status, ConnectionStatus::Connecting | ConnectionStatus::Reconnecting) {
            return;
        }
        self.pending_reconnect = None;
        self.reconnect_attempts = 0;
        self.set_status(ConnectionStatus::Connected);

        for message in self.queue.drain() {
            self.actions.push(ChannelAction::Transmit(message));
        }

        self.subscribers.dispatch(&ChannelMessage::new(EVENT_CONNECTION_ESTABLISHED));
        self.last_heartbeat = Some(now);
    }

    /// The transport closed.
    ///
    /// After an intentional `disconnect()` this settles at `Disconnected`.
    /// Otherwise a reconnect is scheduled with exponential backoff and
    /// jitter while the attempt budget lasts; past the budget the channel
    /// settles at `Disconnected` until an explicit `connect()`.
    pub fn transport_closed(&mut self, now: E::Instant) {
        if self.status == ConnectionStatus::Disconnected {
            return;
        }
        self.last_heartbeat = None;

        // A close trailing a transport error finds the retry already
        // armed; the timer set there keeps running.
        if self.pending_reconnect.is_some() {
            return;
        }

        self.schedule_reconnect(now);
    }

    /// The transport reported a failure.
    ///
    /// Transitions to `Error`, dispatches the synthetic `error` event, and
    /// schedules the same backoff reconnect as an unintentional close, so
    /// a failed open recovers even when the driver never reports a close.
    /// Failures never propagate to the caller.
    pub fn transport_errored(&mut self, error: ChannelError, now: E::Instant) {
        if self.status == ConnectionStatus::Disconnected {
            return;
        }
        if self.pending_reconnect.is_some() {
            tracing::debug!(%error, "transport failure while a retry is already pending");
            return;
        }
        tracing::debug!(%error, transient = error.is_transient(), "transport failure");
        self.last_heartbeat = None;
        self.set_status(ConnectionStatus::Error);
        self.subscribers.dispatch(&ChannelMessage::with_data(
            EVENT_ERROR,
            json!({ "message": error.to_string() }),
        ));
        self.schedule_reconnect(now);
    }

    /// Shared closure path: settle at `Disconnected` after an intentional
    /// close or an exhausted budget, otherwise arm the next attempt with
    /// exponential backoff and jitter.
    fn schedule_reconnect(&mut self, now: E::Instant) {
        if self.intentional_close || !self.config.enabled {
            self.set_status(ConnectionStatus::Disconnected);
            return;
        }

        if self.reconnect_attempts >= self.config.max_reconnect_attempts {
            let error = ChannelError::RetryBudgetExhausted { attempts: self.reconnect_attempts };
            tracing::warn!(%error, "settling at disconnected");
            self.subscribers.dispatch(&ChannelMessage::with_data(
                EVENT_ERROR,
                json!({ "message": error.to_string() }),
            ));
            self.set_status(ConnectionStatus::Disconnected);
            return;
        }

        let delay = backoff_delay(&self.config.backoff, self.reconnect_attempts)
            + jitter(&self.config.backoff, self.env.random_u64());
        self.reconnect_attempts += 1;
        self.pending_reconnect = Some(PendingReconnect { scheduled_at: now, delay });
        self.set_status(ConnectionStatus::Reconnecting);
    }

    /// Process inbound text from the transport.
    ///
    /// Malformed payloads are logged and ignored, never propagated.
    /// `ping` is answered with `pong`; `pong` is consumed internally.
    /// Everything else is dispatched to subscribers by its kind.
    pub fn message_received(&mut self, text: &str) {
        let message = match ChannelMessage::decode(text) {
            Ok(message) => message,
            Err(err) => {
                let error = ChannelError::from(err);
                tracing::debug!(%error, "dropping malformed inbound payload");
                return;
            },
        };

        if message.kind == beacon_proto::TYPE_PING {
            self.actions.push(ChannelAction::Transmit(ChannelMessage::pong()));
            return;
        }
        if message.kind == beacon_proto::TYPE_PONG {
            return;
        }

        self.subscribers.dispatch(&message);
    }

    /// Process periodic maintenance: due reconnect attempts and heartbeat
    /// probes.
    ///
    /// No heartbeat is sent while disconnected or reconnecting, and no
    /// timer fires after an intentional disconnect.
    pub fn tick(&mut self, now: E::Instant) {
        if let Some(pending) = self.pending_reconnect
            && now - pending.scheduled_at >= pending.delay
        {
            self.pending_reconnect = None;
            self.actions.push(ChannelAction::OpenTransport { url: self.config.url.clone() });
        }

        if self.status == ConnectionStatus::Connected
            && let Some(interval) = self.config.heartbeat_interval
            && let Some(last) = self.last_heartbeat
            && now - last >= interval
        {
            self.actions.push(ChannelAction::Transmit(ChannelMessage::ping()));
            self.last_heartbeat = Some(now);
        }
    }

    /// Record a transition and notify observers synchronously. Assigning
    /// the current status again is not a transition and stays silent.
    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        self.subscribers.notify_status(status);
    }
}
