//! # Gamedock Bridge
//!
//! The message bridge between host code and the embedded engine instance.
//!
//! ## Architecture Role
//!
//! ```text
//! [Host code] ──send()──→ [Bridge] ──call──→ [Engine instance]
//!                            │ (no handle: FIFO queue, flushed on install)
//!                            │
//! [Engine glue] ──dispatch_inbound()──→ [Bridge] ──→ typed handlers
//!                                          │
//!                                          └──→ global observers
//! ```
//!
//! ## Ownership Rules
//!
//! - Exactly one instance handle exists system-wide; the bridge holds it.
//! - Only the lifecycle manager calls [`MessageBridge::set_instance`] and
//!   [`MessageBridge::clear_instance`].
//! - Handler faults are isolated per invocation: one faulty subscriber never
//!   prevents delivery to any other subscriber or observer.

pub mod bridge;
pub mod registry;

pub use bridge::MessageBridge;
pub use registry::{GlobalObserver, HandlerId, InboundHandler, ObserverId};
