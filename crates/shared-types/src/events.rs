//! # Inbound Channel Events
//!
//! Types for the single page-wide broadcast signal the embedded engine uses
//! to notify the host. The wire shape is `{type, payload, meta}` where the
//! payload is an optional string; normalization into [`EventPayload`] happens
//! exactly once per event, and every handler observes the same normalized
//! value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A raw event as delivered on the shared engine-to-host channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Event type used for handler routing (e.g. `"ready"`, `"result"`).
    pub event_type: String,

    /// Raw textual payload, absent for signal-only events.
    pub payload: Option<String>,

    /// Producer-supplied metadata, passed through to handlers unchanged.
    #[serde(default)]
    pub meta: EventMeta,
}

impl InboundEvent {
    /// Create an event with no payload and empty metadata.
    #[must_use]
    pub fn signal(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: None,
            meta: EventMeta::default(),
        }
    }

    /// Create an event carrying a textual payload.
    #[must_use]
    pub fn with_payload(event_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: Some(payload.into()),
            meta: EventMeta::default(),
        }
    }
}

/// Metadata attached to an inbound event by its producer.
///
/// The host treats the contents as opaque; the correlation id exists so that
/// request/response pairs crossing the channel can be matched in logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMeta {
    /// Correlation id for matching related events across the channel.
    pub correlation_id: Option<Uuid>,

    /// Free-form producer fields.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl EventMeta {
    /// Metadata carrying only a fresh correlation id.
    #[must_use]
    pub fn correlated() -> Self {
        Self {
            correlation_id: Some(Uuid::new_v4()),
            fields: Map::new(),
        }
    }
}

/// The normalized form of an inbound payload.
///
/// Textual payloads are parsed as JSON on a best-effort basis; text that is
/// not valid JSON is retained unchanged. Events without a payload normalize
/// to [`EventPayload::Empty`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// Payload parsed as structured data.
    Json(Value),
    /// Raw text that did not parse as structured data.
    Text(String),
    /// The event carried no payload.
    Empty,
}

impl EventPayload {
    /// Normalize a raw channel payload.
    ///
    /// Runs once per event; the result is shared across all handlers.
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Empty,
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => Self::Json(value),
                Err(_) => Self::Text(text.to_string()),
            },
        }
    }

    /// The structured value, if the payload parsed as JSON.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The raw text, if the payload did not parse.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the event carried no payload at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
