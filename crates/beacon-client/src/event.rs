//! Channel actions.
//!
//! The channel state machine performs no I/O. Every operation that needs
//! the network is expressed as a [`ChannelAction`] for the driver (runtime
//! or test harness) to execute.

use beacon_proto::ChannelMessage;

/// Actions produced by the channel for the caller to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelAction {
    /// Open the transport to the push endpoint.
    OpenTransport {
        /// Endpoint URL from the channel configuration.
        url: String,
    },

    /// Serialize and transmit this message on the open transport.
    Transmit(ChannelMessage),

    /// Close the transport with a normal-closure code.
    CloseTransport,
}
