//! # Outbound Messages
//!
//! Types for host-to-engine calls. A call names a target object and method
//! inside the engine and carries one textual argument; structured payloads
//! are serialized to a JSON string before the call crosses the channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A host-to-engine call captured while no instance handle exists.
///
/// Queued messages preserve FIFO order and are attempted at most once when
/// the queue is flushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Engine-side object the call targets.
    pub target_object: String,
    /// Method on the target object.
    pub target_method: String,
    /// Serialized call argument.
    pub payload: String,
}

impl OutboundMessage {
    /// Capture a call for later delivery. Serializes the payload eagerly so
    /// a queued message is wire-ready at flush time.
    #[must_use]
    pub fn new(
        target_object: impl Into<String>,
        target_method: impl Into<String>,
        payload: OutboundPayload,
    ) -> Self {
        Self {
            target_object: target_object.into(),
            target_method: target_method.into(),
            payload: payload.into_wire(),
        }
    }
}

/// Payload of an outbound call before serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundPayload {
    /// Textual payload, passed to the engine unchanged.
    Text(String),
    /// Structured payload, serialized to a JSON string before the call.
    Json(Value),
}

impl OutboundPayload {
    /// The string actually handed to the engine call.
    #[must_use]
    pub fn into_wire(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for OutboundPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for OutboundPayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for OutboundPayload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
