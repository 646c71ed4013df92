//! Channel error taxonomy.
//!
//! Nothing in the channel throws across its public API under normal
//! operation: failure is absorbed into status values, dispatched `error`
//! events, or silent drops. These types exist for the internal boundaries
//! (transport driver, envelope codec) where a typed error is still useful.

use thiserror::Error;

/// Errors observed inside the push channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Underlying transport failed (refused, reset, timed out).
    ///
    /// Recovered locally via the reconnection state machine; surfaced to
    /// consumers only as a status indicator.
    #[error("transport error: {0}")]
    Transport(String),

    /// Inbound payload did not parse as a channel envelope.
    ///
    /// Dropped with a diagnostic log, never propagated.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The reconnect attempt budget was exhausted.
    ///
    /// The channel settles at disconnected until an explicit connect.
    #[error("retry budget exhausted after {attempts} attempts")]
    RetryBudgetExhausted {
        /// Consecutive failed attempts before giving up.
        attempts: u32,
    },
}

impl ChannelError {
    /// True if the error is transient and a retry may succeed.
    ///
    /// Transport failures are transient; malformed traffic is not (a broken
    /// peer stays broken), and an exhausted budget requires explicit user
    /// action.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<beacon_proto::ProtocolError> for ChannelError {
    fn from(err: beacon_proto::ProtocolError) -> Self {
        Self::Protocol(err.to_string())
    }
}
