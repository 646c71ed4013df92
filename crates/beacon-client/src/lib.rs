//! Reconnecting channel manager for the Beacon push endpoint.
//!
//! The [`Channel`] is a Sans-IO state machine: it decides what the
//! connection should do and emits [`ChannelAction`]s; executing them is
//! the driver's job. The optional `transport` feature provides a
//! production WebSocket driver backend.
//!
//! # Example
//!
//! ```
//! use beacon_client::{Channel, ChannelConfig};
//! use beacon_core::{Environment, SystemEnv};
//!
//! let env = SystemEnv;
//! let mut channel = Channel::new(env, ChannelConfig::new("wss://push.example/channel"));
//!
//! channel.on("booking:new", |message| {
//!     println!("new booking: {:?}", message.data);
//! });
//!
//! channel.connect(env.now());
//! for action in channel.take_actions() {
//!     // hand to the transport driver
//!     let _ = action;
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
mod event;
mod subscribers;

#[cfg(feature = "transport")]
pub mod transport;

pub use channel::{
    Channel, ChannelConfig, DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_MAX_RECONNECT_ATTEMPTS,
};
pub use event::ChannelAction;
pub use subscribers::SubscriptionId;
