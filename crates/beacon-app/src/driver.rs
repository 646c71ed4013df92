//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific
//! I/O implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use crate::{App, AppEvent};

/// Transport-level happenings surfaced by the driver.
///
/// The runtime feeds these into the channel state machine through the
/// bridge's transport callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The transport opened.
    Opened,
    /// A text payload arrived.
    Text(String),
    /// The transport reported a failure.
    Errored(String),
    /// The transport is gone.
    Closed,
}

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic, so the same
/// orchestration code runs in production and in tests.
///
/// The presentation side effects (`play_cue`, `announce`) are best-effort:
/// a denied permission or unsupported platform returns an error that the
/// runtime logs and swallows, never propagates.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in tests.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Poll for the next application-level event.
    ///
    /// Returns an available event or `None` if no events are ready.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Poll for the next transport event.
    fn poll_transport(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Open the transport to the given endpoint.
    ///
    /// Completion is reported through [`Driver::poll_transport`]
    /// (`Opened` or `Errored`), not by this call.
    fn open_transport(&mut self, url: &str) -> impl Future<Output = ()> + Send;

    /// Transmit a serialized message on the open transport.
    fn send_text(&mut self, text: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close the transport with a normal-closure code.
    fn close_transport(&mut self) -> impl Future<Output = ()> + Send;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Play the notification audio cue.
    ///
    /// # Errors
    ///
    /// Returns an error when playback is unavailable; the runtime logs
    /// and continues.
    fn play_cue(&mut self) -> Result<(), Self::Error>;

    /// Raise a platform-level notification.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform denies it; the runtime logs and
    /// continues.
    fn announce(&mut self, title: &str, message: &str) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
