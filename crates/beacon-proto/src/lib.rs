//! Protocol
//!
//! Wire types for the Beacon push channel. Both directions of the channel
//! carry JSON-encoded [`ChannelMessage`] envelopes; the `type` field is the
//! dispatch key used to route inbound traffic to subscribers.
//!
//! # Reserved names
//!
//! - [`TYPE_PING`] / [`TYPE_PONG`]: liveness probes, consumed by the channel
//!   and never delivered to application subscribers.
//! - [`EVENT_CONNECTION_ESTABLISHED`] / [`EVENT_ERROR`]: synthetic events
//!   emitted locally by the channel, never received on the wire.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod errors;
mod message;

pub use errors::{ProtocolError, Result};
pub use message::{
    ChannelMessage, EVENT_CONNECTION_ESTABLISHED, EVENT_ERROR, TYPE_PING, TYPE_PONG,
};
