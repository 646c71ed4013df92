//! Core
//!
//! Shared primitives for the Beacon push channel:
//!
//! - [`ConnectionStatus`]: the finite connection state enumeration
//! - [`Environment`]: time/randomness abstraction for deterministic testing
//! - [`BackoffConfig`] and the backoff schedule used between reconnects
//! - [`SendQueue`]: the bounded drop-oldest outbound buffer
//! - [`ChannelError`]: channel-level error taxonomy
//!
//! Everything here is Sans-IO: no sockets, no timers, no logging. The
//! channel state machine in `beacon-client` composes these primitives and
//! returns actions for a driver to execute.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod backoff;
mod env;
mod error;
mod queue;
mod status;

pub use backoff::{BackoffConfig, backoff_delay, jitter};
pub use env::{Environment, SystemEnv};
pub use error::ChannelError;
pub use queue::{DEFAULT_QUEUE_CAPACITY, SendQueue};
pub use status::ConnectionStatus;
