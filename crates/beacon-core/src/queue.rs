//! Bounded outbound message queue.
//!
//! Messages sent while the transport is closed are held here and flushed,
//! in enqueue order, after the next successful connection. The queue is a
//! drop-oldest FIFO: when full, the oldest entry is evicted to admit the
//! newest. Overflow is lossy by design, not an error.

use std::collections::VecDeque;

use beacon_proto::ChannelMessage;

/// Default capacity of the outbound queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Bounded drop-oldest FIFO of messages awaiting a connection.
#[derive(Debug, Clone, Default)]
pub struct SendQueue {
    entries: VecDeque<ChannelMessage>,
    capacity: usize,
}

impl SendQueue {
    /// Create a queue with the given capacity (clamped to at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Enqueue a message, evicting the oldest entry when full.
    ///
    /// Returns the evicted message, if any, so callers can log the drop.
    pub fn push(&mut self, message: ChannelMessage) -> Option<ChannelMessage> {
        let evicted =
            if self.entries.len() == self.capacity { self.entries.pop_front() } else { None };
        self.entries.push_back(message);
        evicted
    }

    /// Take all queued messages in enqueue (FIFO) order, leaving the queue
    /// empty.
    pub fn drain(&mut self) -> Vec<ChannelMessage> {
        self.entries.drain(..).collect()
    }

    /// Number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
