//! Subscriber registry.
//!
//! A registry of handlers keyed by event name plus a list of status
//! observers. Delivery order is registration order; removal is by identity
//! via [`SubscriptionId`]. A panicking handler is isolated (caught and
//! logged) so it cannot prevent delivery to subsequent handlers or poison
//! the channel.

use std::panic::{AssertUnwindSafe, catch_unwind};

use beacon_core::ConnectionStatus;
use beacon_proto::ChannelMessage;

/// Identity of a registered handler.
///
/// Returned by the channel's subscribe operations; passing it to
/// `unsubscribe` removes exactly that handler. Stale or repeated ids are
/// ignored, so unsubscribing is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type EventHandler = Box<dyn FnMut(&ChannelMessage) + Send>;
type StatusHandler = Box<dyn FnMut(ConnectionStatus) + Send>;

/// Handler registry backing `on` / `on_status_change`.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    event_handlers: Vec<(SubscriptionId, String, EventHandler)>,
    status_handlers: Vec<(SubscriptionId, StatusHandler)>,
}

impl Subscribers {
    fn issue_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a handler for the given event kind.
    pub(crate) fn add_event(
        &mut self,
        kind: impl Into<String>,
        handler: impl FnMut(&ChannelMessage) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.issue_id();
        self.event_handlers.push((id, kind.into(), Box::new(handler)));
        id
    }

    /// Register a status observer.
    pub(crate) fn add_status(
        &mut self,
        handler: impl FnMut(ConnectionStatus) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.issue_id();
        self.status_handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove the handler with this id from either table. No-op for
    /// unknown ids.
    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.event_handlers.retain(|(entry_id, _, _)| *entry_id != id);
        self.status_handlers.retain(|(entry_id, _)| *entry_id != id);
    }

    /// Deliver a message to every handler registered for its kind, in
    /// registration order.
    pub(crate) fn dispatch(&mut self, message: &ChannelMessage) {
        for (_, kind, handler) in &mut self.event_handlers {
            if kind == &message.kind {
                invoke_isolated(|| handler(message), kind);
            }
        }
    }

    /// Notify every status observer of a transition, in registration order.
    pub(crate) fn notify_status(&mut self, status: ConnectionStatus) {
        for (_, handler) in &mut self.status_handlers {
            invoke_isolated(|| handler(status), "status");
        }
    }

    /// Invoke a single status observer (used to deliver the current status
    /// immediately on subscription).
    pub(crate) fn notify_status_one(&mut self, id: SubscriptionId, status: ConnectionStatus) {
        if let Some((_, handler)) = self.status_handlers.iter_mut().find(|(entry_id, _)| *entry_id == id)
        {
            invoke_isolated(|| handler(status), "status");
        }
    }
}

/// Run a handler, catching panics so one broken subscriber cannot stop
/// delivery to the rest.
fn invoke_isolated(handler: impl FnMut(), context: &str) {
    let mut handler = handler;
    if catch_unwind(AssertUnwindSafe(|| handler())).is_err() {
        tracing::warn!(context, "subscriber handler panicked; continuing delivery");
    }
}
