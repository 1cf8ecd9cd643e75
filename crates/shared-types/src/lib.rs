//! # Shared Types Crate
//!
//! This crate contains the domain types shared across the Gamedock crates:
//! inbound channel events, outbound messages, the engine instance handle
//! contract, and the loading state machine.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Narrow Channel**: The engine is reachable only through
//!   [`EngineInstance::call`] outbound and [`InboundEvent`] inbound; no other
//!   surface exists between the two runtimes.
//! - **Best-Effort Payloads**: Payload normalization parses structured data
//!   opportunistically and never rejects an event.

pub mod errors;
pub mod events;
pub mod instance;
pub mod messages;
pub mod state;

pub use errors::HandlerError;
pub use events::{EventMeta, EventPayload, InboundEvent};
pub use instance::{CallError, EngineInstance};
pub use messages::{OutboundMessage, OutboundPayload};
pub use state::LoadingState;

/// Event type emitted by the engine glue once the instance can receive calls.
pub const READY_EVENT: &str = "ready";

/// Event type carrying a structured result payload from the engine.
pub const RESULT_EVENT: &str = "result";
