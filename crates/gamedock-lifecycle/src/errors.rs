//! Error types for the lifecycle subsystem.

use thiserror::Error;

/// Failure of one load attempt.
///
/// Surfaced through the manager's `Error` state; retried only by an
/// explicit reload. A superseded attempt's failure is discarded internally
/// and never reaches this surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// Phase 1 failed: the loader resource was unreachable.
    #[error("loader resource unreachable: {url}: {reason}")]
    ResourceLoad {
        /// Location of the loader artifact.
        url: String,
        /// Provider-reported reason.
        reason: String,
    },

    /// Phase 2 failed: the engine rejected instance construction.
    #[error("engine instance construction rejected: {reason}")]
    InstanceCreation {
        /// Provider-reported reason.
        reason: String,
    },
}
