//! Channel message envelope.
//!
//! A [`ChannelMessage`] is the JSON envelope exchanged with the push
//! endpoint in both directions:
//!
//! ```json
//! { "type": "booking:new", "data": { ... }, "timestamp": "2026-08-30T12:00:00Z" }
//! ```
//!
//! `data` and `timestamp` are optional; unknown fields are tolerated on
//! decode so the endpoint can evolve without breaking older clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// Reserved type for outbound liveness probes.
pub const TYPE_PING: &str = "ping";

/// Reserved type for liveness replies. Consumed internally, never surfaced
/// to application subscribers.
pub const TYPE_PONG: &str = "pong";

/// Synthetic event dispatched to subscribers after a connection succeeds.
pub const EVENT_CONNECTION_ESTABLISHED: &str = "connection:established";

/// Synthetic event dispatched to subscribers on transport errors.
pub const EVENT_ERROR: &str = "error";

/// Wire-level envelope for inbound and outbound channel traffic.
///
/// `kind` (serialized as `type`) is the dispatch key. The envelope itself
/// makes no guarantees about `data`; consumers validate payload shape at
/// their own boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Dispatch key. [`TYPE_PING`]/[`TYPE_PONG`] are reserved.
    #[serde(rename = "type")]
    pub kind: String,

    /// Arbitrary structured payload. `None` when absent on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Sender-supplied wall-clock timestamp (ISO-8601). `None` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChannelMessage {
    /// Create an envelope with the given dispatch key and no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), data: None, timestamp: None }
    }

    /// Create an envelope with a structured payload.
    pub fn with_data(kind: impl Into<String>, data: Value) -> Self {
        Self { kind: kind.into(), data: Some(data), timestamp: None }
    }

    /// Outbound liveness probe.
    #[must_use]
    pub fn ping() -> Self {
        Self::new(TYPE_PING)
    }

    /// Liveness reply.
    #[must_use]
    pub fn pong() -> Self {
        Self::new(TYPE_PONG)
    }

    /// True for `ping`/`pong` envelopes, which are handled by the channel
    /// itself and never delivered to subscribers.
    #[must_use]
    pub fn is_liveness(&self) -> bool {
        self.kind == TYPE_PING || self.kind == TYPE_PONG
    }

    /// Serialize to the wire representation.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Encode`] if the payload cannot be serialized
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode { reason: e.to_string() })
    }

    /// Parse an inbound envelope.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Malformed`] if `text` is not a valid envelope
    /// - [`ProtocolError::EmptyType`] if the dispatch key is empty
    pub fn decode(text: &str) -> Result<Self> {
        let message: Self = serde_json::from_str(text)?;

        if message.kind.is_empty() {
            return Err(ProtocolError::EmptyType);
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_minimal_envelope() {
        let message = ChannelMessage::decode(r#"{"type":"booking:new"}"#).unwrap();
        assert_eq!(message.kind, "booking:new");
        assert_eq!(message.data, None);
        assert_eq!(message.timestamp, None);
    }

    #[test]
    fn decode_tolerates_unknown_fields() {
        let message =
            ChannelMessage::decode(r#"{"type":"x","data":{"a":1},"extra":true}"#).unwrap();
        assert_eq!(message.kind, "x");
        assert_eq!(message.data, Some(json!({"a": 1})));
    }

    #[test]
    fn decode_rejects_empty_type() {
        let result = ChannelMessage::decode(r#"{"type":""}"#);
        assert_eq!(result, Err(ProtocolError::EmptyType));
    }

    #[test]
    fn decode_rejects_non_json() {
        let result = ChannelMessage::decode("not json");
        assert!(matches!(result, Err(ProtocolError::Malformed { .. })));
    }

    #[test]
    fn encode_omits_absent_fields() {
        let text = ChannelMessage::new("pong").encode().unwrap();
        assert_eq!(text, r#"{"type":"pong"}"#);
    }

    #[test]
    fn roundtrip_preserves_payload() {
        let message = ChannelMessage::with_data("metrics:update", json!({"visitors": 7}));
        let decoded = ChannelMessage::decode(&message.encode().unwrap()).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn liveness_types_are_reserved() {
        assert!(ChannelMessage::ping().is_liveness());
        assert!(ChannelMessage::pong().is_liveness());
        assert!(!ChannelMessage::new("booking:new").is_liveness());
    }
}
