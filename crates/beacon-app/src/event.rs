//! Application events.

use beacon_core::ConnectionStatus;

/// Events consumed by the [`crate::App`] state machine.
///
/// Produced by the [`crate::Bridge`] (channel and store activity) and by
/// the driver (ticks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic tick with no other payload.
    Tick,

    /// The channel's connection status changed.
    StatusChanged(ConnectionStatus),

    /// The unread notification count changed.
    UnreadChanged(usize),

    /// A channel error surfaced to the user.
    Error {
        /// Human-readable description.
        message: String,
    },
}
