//! # Gamedock Runtime
//!
//! The composition root for embedding one engine instance in a host
//! application.
//!
//! ## Architectural Patterns
//!
//! - **Explicit Context**: All shared state (bridge, bus, lifecycle) lives
//!   in one [`HostContext`] constructed by the composing application; there
//!   are no module-level singletons, and shutdown is an explicit call.
//! - **Hexagonal Architecture**: The lifecycle manager's provider port is
//!   implemented by adapters; mock adapters ship in-tree for tests.
//! - **Single Channel**: The engine reaches the host only through the
//!   inbound channel adapter feeding the bridge.

pub mod adapters;
pub mod container;
pub mod logging;

pub use container::{HostConfig, HostContext};
pub use logging::{init_logging, LoggingConfig, LoggingError};
