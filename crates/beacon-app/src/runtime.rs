//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: presentation state machine
//! - [`Bridge`]: channel and notification store
//! - [`Driver`]: platform-specific I/O

use beacon_client::ChannelAction;
use beacon_core::Environment;
use beacon_store::{Storage, StoreAction};
use chrono::Utc;

use crate::{App, AppAction, AppEvent, Bridge, Driver, TransportEvent};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `S`: Storage backend for the notification ledger
/// - `E`: Environment providing time and entropy
pub struct Runtime<D, S, E>
where
    D: Driver,
    S: Storage,
    E: Environment,
{
    driver: D,
    app: App,
    bridge: Bridge<S, E>,
}

impl<D, S, E> Runtime<D, S, E>
where
    D: Driver<Instant = E::Instant>,
    S: Storage,
    E: Environment,
{
    /// Create a new runtime around an already-wired bridge.
    pub fn new(driver: D, bridge: Bridge<S, E>) -> Self {
        Self { driver, app: App::new(), bridge }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for application and transport events from the driver
    /// 2. Feeds transport events into the channel state machine
    /// 3. Pumps bridge activity into the App
    /// 4. Executes channel and presentation actions through the driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;
        self.bridge.connect(self.driver.now());
        self.flush_channel_actions().await;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.bridge.teardown();
        self.flush_channel_actions().await;
        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        if let Some(event) = self.driver.poll_event().await?
            && self.process_app_events(vec![event]).await?
        {
            return Ok(true);
        }

        if let Some(event) = self.driver.poll_transport().await {
            let now = self.driver.now();
            match event {
                TransportEvent::Opened => self.bridge.transport_opened(now),
                TransportEvent::Text(text) => self.bridge.message_received(&text),
                TransportEvent::Errored(reason) => self.bridge.transport_errored(&reason, now),
                TransportEvent::Closed => self.bridge.transport_closed(now),
            }
        }

        self.bridge.handle_tick(self.driver.now());

        let events = self.bridge.pump(Utc::now());
        let quit = self.process_app_events(events).await?;

        self.flush_channel_actions().await;
        self.execute_store_actions();

        Ok(quit)
    }

    /// Feed events through the App and execute the resulting actions.
    ///
    /// Returns `true` if should quit.
    async fn process_app_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            for action in self.app.handle(event) {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Reconnect => {
                        self.bridge.connect(self.driver.now());
                        self.flush_channel_actions().await;
                    },
                }
            }
        }
        Ok(false)
    }

    /// Execute pending channel actions through the driver.
    ///
    /// A failed transmit never escapes: the message goes back into the
    /// channel's offline queue for replay and the failure feeds the
    /// reconnect path, so the host loop keeps running.
    async fn flush_channel_actions(&mut self) {
        for action in self.bridge.take_channel_actions() {
            match action {
                ChannelAction::OpenTransport { url } => {
                    self.driver.open_transport(&url).await;
                },
                ChannelAction::Transmit(message) => match message.encode() {
                    Ok(text) => {
                        if let Err(err) = self.driver.send_text(&text).await {
                            tracing::warn!(%err, "transmit failed; requeueing for replay");
                            let now = self.driver.now();
                            self.bridge.transport_errored(&err.to_string(), now);
                            let _ = self.bridge.send(message);
                        }
                    },
                    Err(err) => tracing::warn!(%err, "dropping unencodable outbound message"),
                },
                ChannelAction::CloseTransport => self.driver.close_transport().await,
            }
        }
    }

    /// Execute presentation side effects, absorbing their failures.
    fn execute_store_actions(&mut self) {
        for action in self.bridge.take_store_actions() {
            match action {
                StoreAction::PlayCue => {
                    best_effort("audio cue", self.driver.play_cue());
                },
                StoreAction::Announce { title, message } => {
                    best_effort("platform notification", self.driver.announce(&title, &message));
                },
            }
        }
    }

    /// Get a reference to the App.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Bridge.
    pub fn bridge(&self) -> &Bridge<S, E> {
        &self.bridge
    }

    /// Get a mutable reference to the Bridge.
    pub fn bridge_mut(&mut self) -> &mut Bridge<S, E> {
        &mut self.bridge
    }
}

/// Try-log-continue boundary for best-effort side effects.
///
/// A denied permission or unsupported platform is expected here, so the
/// failure becomes a debug log and nothing else.
fn best_effort<T, Err: std::fmt::Display>(label: &str, result: Result<T, Err>) {
    if let Err(err) = result {
        tracing::debug!(label, %err, "best-effort side effect skipped");
    }
}
