//! Presentation state.

use beacon_core::ConnectionStatus;

/// Everything the presentation layer needs from the subsystem.
///
/// A read-only snapshot: presentation never mutates channel or store state
/// directly, it renders this view and invokes the documented operations
/// ([`crate::App::reconnect`], the store's read-marking calls).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Current connection status.
    pub status: ConnectionStatus,
    /// True only while the transport is open.
    pub is_connected: bool,
    /// Whether a manual reconnect action makes sense right now.
    pub can_retry: bool,
    /// Unread notification badge count.
    pub unread_count: usize,
    /// Most recent surfaced error, if any.
    pub last_error: Option<String>,
}
