//! Application actions.

/// Instructions produced by the [`crate::App`] for the runtime to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Re-render the presentation from current state.
    Render,

    /// Ask the channel to reconnect.
    Reconnect,

    /// Shut the application down.
    Quit,
}
