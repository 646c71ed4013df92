//! Application state machine.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs
//! and produces [`crate::AppAction`] instructions for the runtime to
//! execute. It mirrors the channel status and unread badge for the
//! presentation layer; the authoritative state lives in the channel and
//! the store behind the [`crate::Bridge`].

use beacon_core::ConnectionStatus;

use crate::{AppAction, AppEvent, StatusView};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable without a transport.
#[derive(Debug, Clone, Default)]
pub struct App {
    status: ConnectionStatus,
    unread_count: usize,
    /// Most recent surfaced error. Cleared when the channel reconnects.
    last_error: Option<String>,
}

impl App {
    /// Create an app in the disconnected state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::StatusChanged(status) => {
                if status.is_connected() {
                    self.last_error = None;
                }
                if self.status == status {
                    return vec![];
                }
                self.status = status;
                vec![AppAction::Render]
            },
            AppEvent::UnreadChanged(count) => {
                if self.unread_count == count {
                    return vec![];
                }
                self.unread_count = count;
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.last_error = Some(message);
                vec![AppAction::Render]
            },
        }
    }

    /// User asked for a manual reconnect.
    ///
    /// Only meaningful while disconnected or errored; otherwise a render
    /// is the only effect.
    pub fn reconnect(&self) -> Vec<AppAction> {
        if self.can_retry() {
            vec![AppAction::Reconnect, AppAction::Render]
        } else {
            vec![AppAction::Render]
        }
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
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

    /// Whether the manual reconnect affordance should be shown.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.status.can_retry()
    }

    /// Unread notification badge count.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    /// Read-only snapshot for the presentation layer.
    #[must_use]
    pub fn status_view(&self) -> StatusView {
        StatusView {
            status: self.status,
            is_connected: self.is_connected(),
            can_retry: self.can_retry(),
            unread_count: self.unread_count,
            last_error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_change_renders_and_updates_view() {
        let mut app = App::new();
        let actions = app.handle(AppEvent::StatusChanged(ConnectionStatus::Connecting));
        assert_eq!(actions, [AppAction::Render]);
        assert_eq!(app.status(), ConnectionStatus::Connecting);

        // Same status again is not a change.
        let actions = app.handle(AppEvent::StatusChanged(ConnectionStatus::Connecting));
        assert!(actions.is_empty());
    }

    #[test]
    fn connecting_clears_previous_error() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::Error { message: "refused".into() });
        assert_eq!(app.status_view().last_error.as_deref(), Some("refused"));

        let _ = app.handle(AppEvent::StatusChanged(ConnectionStatus::Connected));
        assert_eq!(app.status_view().last_error, None);
    }

    #[test]
    fn reconnect_only_fires_when_retry_makes_sense() {
        let mut app = App::new();
        assert_eq!(app.reconnect(), [AppAction::Reconnect, AppAction::Render]);

        let _ = app.handle(AppEvent::StatusChanged(ConnectionStatus::Connected));
        assert_eq!(app.reconnect(), [AppAction::Render]);

        let _ = app.handle(AppEvent::StatusChanged(ConnectionStatus::Error));
        assert_eq!(app.reconnect(), [AppAction::Reconnect, AppAction::Render]);
    }

    #[test]
    fn unread_badge_tracks_events() {
        let mut app = App::new();
        assert_eq!(app.handle(AppEvent::UnreadChanged(3)), [AppAction::Render]);
        assert_eq!(app.unread_count(), 3);
        assert!(app.handle(AppEvent::UnreadChanged(3)).is_empty());
    }

    #[test]
    fn view_derives_booleans_from_status() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::StatusChanged(ConnectionStatus::Connected));
        let view = app.status_view();
        assert!(view.is_connected);
        assert!(!view.can_retry);

        let _ = app.handle(AppEvent::StatusChanged(ConnectionStatus::Reconnecting));
        let view = app.status_view();
        assert!(!view.is_connected);
        assert!(!view.can_retry);
    }
}
