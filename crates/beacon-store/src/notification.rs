//! Notification model.

use beacon_proto::ChannelMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A new booking request arrived.
    Booking,
    /// Operational message from the platform itself.
    System,
    /// Something needs the user's attention.
    Alert,
    /// Informational, no action required.
    Info,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Booking => write!(f, "booking"),
            Self::System => write!(f, "system"),
            Self::Alert => write!(f, "alert"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A user-facing notification.
///
/// Created exclusively by the store: `id`, `timestamp`, and `read` are
/// assigned there and never by callers. Mutated only through the store's
/// read-marking operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique for the lifetime of the store; never reused.
    pub id: String,
    /// Category, drives presentation (icon, cue).
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Creation time (ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,
    /// Whether the user has seen this entry.
    pub read: bool,
    /// Optional structured payload carried from the originating event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Caller-supplied part of a notification.
///
/// The store fills in the rest on [`add`](crate::NotificationStore::add_notification).
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    /// Category.
    pub kind: NotificationKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Optional structured payload.
    pub data: Option<Value>,
}

impl NotificationDraft {
    /// Draft with the given category and text.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self { kind, title: title.into(), message: message.into(), data: None }
    }

    /// Attach a structured payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Translate an inbound channel event into a draft.
    ///
    /// Returns `None` for events that do not produce a notification
    /// (`metrics:update` is observation-only, liveness traffic never
    /// reaches here but is excluded anyway).
    pub fn from_channel_message(message: &ChannelMessage) -> Option<Self> {
        let field = |name: &str| {
            message
                .data
                .as_ref()
                .and_then(|data| data.get(name))
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        let draft = match message.kind.as_str() {
            "booking:new" => Self::new(
                NotificationKind::Booking,
                field("title").unwrap_or_else(|| "New booking request".to_owned()),
                field("message").unwrap_or_else(|| "A new booking request arrived".to_owned()),
            ),
            "notification:new" => {
                let kind = match field("kind").as_deref() {
                    Some("booking") => NotificationKind::Booking,
                    Some("system") => NotificationKind::System,
                    Some("alert") => NotificationKind::Alert,
                    _ => NotificationKind::Info,
                };
                Self::new(
                    kind,
                    field("title").unwrap_or_else(|| "Notification".to_owned()),
                    field("message").unwrap_or_default(),
                )
            },
            beacon_proto::EVENT_ERROR => Self::new(
                NotificationKind::Alert,
                "Connection issue",
                field("message").unwrap_or_else(|| "The realtime connection failed".to_owned()),
            ),
            _ => return None,
        };

        Some(match message.data.clone() {
            Some(data) => draft.with_data(data),
            None => draft,
        })
    }
}
