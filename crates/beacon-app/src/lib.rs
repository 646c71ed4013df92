//! Application layer for Beacon
//!
//! Pure state machines and a generic runtime wiring the channel and the
//! notification store to a presentation layer, enabling deterministic
//! testing with the same code that runs in production.
//!
//! # Components
//!
//! - [`App`]: presentation state machine (status, unread badge, retry)
//! - [`Bridge`]: owns the channel and store, translates between them
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use driver::{Driver, TransportEvent};
pub use event::AppEvent;
pub use runtime::Runtime;
pub use state::StatusView;
