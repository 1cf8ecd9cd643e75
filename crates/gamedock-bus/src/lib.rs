//! # Gamedock Bus
//!
//! Typed event demultiplexer over the bridge's inbound channel.
//!
//! ## Reference-Counted Activation
//!
//! ```text
//! [Engine] ──event──→ [Bridge] ──global observer──→ [EventBus forwarder]
//!                                                        │
//!                                   ┌────────────────────┼─────────────┐
//!                                   ↓                    ↓             ↓
//!                             subscribers("ready")  subscribers("result") ...
//! ```
//!
//! The bus installs exactly one global forwarder into the bridge, on the
//! first subscription anywhere, and uninstalls it when the last subscriber
//! leaves. Subscriber faults are isolated per invocation, matching the
//! bridge's dispatch policy.

pub mod bus;
pub mod stream;

pub use bus::{BusHandler, BusSubscription, EventBus, SubscriberId};
pub use stream::{BusEvent, EventStream};
