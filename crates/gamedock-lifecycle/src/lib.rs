//! # Gamedock Lifecycle
//!
//! Asynchronous lifecycle of the embedded engine instance.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──load()──→ Loading ──→ { Ready | Error }
//!                     ↑               │
//!                     └── Reloading ←─┘   reload() only
//! ```
//!
//! ## Cancellation
//!
//! Creation cannot be aborted once started. Instead every attempt captures a
//! monotonic id at start; only the attempt whose id still matches the
//! counter at commit time may publish its instance to the bridge. A
//! superseded attempt terminates its freshly built instance, releases its
//! loader, and touches no shared state.
//!
//! The lifecycle manager is the sole writer of the bridge's instance handle.

pub mod config;
pub mod errors;
pub mod manager;
pub mod ports;

pub use config::{CrossOriginPolicy, EngineConfig};
pub use errors::LifecycleError;
pub use manager::LifecycleManager;
pub use ports::{EngineProvider, RenderSurface};
