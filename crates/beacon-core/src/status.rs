//! Connection status enumeration.
//!
//! Exactly one status holds at any time. The channel state machine owns the
//! value; any number of observers mirror it read-only. Transitions are the
//! only way to change it, and every transition notifies observers
//! synchronously before the transitioning call returns.

use std::fmt;

/// Lifecycle state of the push channel connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Initial connection attempt in progress.
    Connecting,
    /// Transport open; traffic flows.
    Connected,
    /// Transport lost; a retry is scheduled or in progress.
    Reconnecting,
    /// Not connected and not retrying. Terminal until an explicit connect.
    #[default]
    Disconnected,
    /// Transport-level failure observed. Recovery follows the same path as
    /// an unintentional close.
    Error,
}

impl ConnectionStatus {
    /// True only while the transport is open.
    #[must_use]
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    /// True when a manual reconnect action is meaningful: the channel is
    /// neither connected nor already retrying.
    #[must_use]
    pub fn can_retry(self) -> bool {
        matches!(self, Self::Disconnected | Self::Error)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}
