//! # Loading State
//!
//! The lifecycle manager's authoritative state machine:
//!
//! ```text
//! Idle ──→ Loading ──→ { Ready | Error }
//!            ↑                │
//!            └── Reloading ←──┘   (explicit reload only)
//! ```

use serde::{Deserialize, Serialize};

/// Observable state of the embedded instance lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadingState {
    /// No load has started, or the manager was torn down.
    Idle,
    /// A load attempt is in flight.
    Loading,
    /// An instance is live and published to the bridge.
    Ready,
    /// The last load attempt failed; retry requires an explicit reload.
    Error,
    /// Teardown finished, waiting out the settle interval before reloading.
    Reloading,
}

impl LoadingState {
    /// Whether a load attempt is currently in flight or pending.
    #[must_use]
    pub fn is_transitional(self) -> bool {
        matches!(self, Self::Loading | Self::Reloading)
    }
}

impl std::fmt::Display for LoadingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Error => "error",
            Self::Reloading => "reloading",
        };
        write!(f, "{name}")
    }
}
