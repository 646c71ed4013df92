//! Protocol error types.
//!
//! Malformed inbound payloads are expected traffic, not exceptional: the
//! channel logs and drops them. These errors exist so that boundary can be
//! explicit rather than silently swallowing serde failures.

use thiserror::Error;

/// Convenience alias for protocol results.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding channel envelopes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload is not valid JSON or does not match the envelope shape.
    #[error("malformed envelope: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },

    /// Envelope parsed but carries no dispatch key.
    #[error("envelope has empty message type")]
    EmptyType,

    /// Envelope could not be serialized.
    #[error("encode failed: {reason}")]
    Encode {
        /// Serializer diagnostic.
        reason: String,
    },
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed { reason: err.to_string() }
    }
}
