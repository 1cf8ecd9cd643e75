//! # Engine Instance Contract
//!
//! The handle trait every embedded engine implementation exposes to the
//! host. Exactly one live handle exists system-wide: the bridge owns it, and
//! only the lifecycle manager writes it.

use thiserror::Error;

/// Failure of a single engine call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallError {
    /// The engine rejected the call.
    #[error("engine rejected {object}.{method}: {reason}")]
    Rejected {
        /// Target object of the failed call.
        object: String,
        /// Target method of the failed call.
        method: String,
        /// Engine-reported reason.
        reason: String,
    },

    /// The instance has been terminated and can no longer service calls.
    #[error("engine instance terminated")]
    Terminated,
}

/// Opaque handle to the embedded engine instance.
///
/// The handle exposes exactly two operations: a side-effecting call into the
/// engine and termination. Implementations are provided by the lifecycle
/// manager's engine provider; the core never constructs one itself.
pub trait EngineInstance: Send + Sync {
    /// Invoke `object.method(payload)` inside the engine.
    ///
    /// The payload is always textual at this point; structured payloads are
    /// serialized before reaching the handle.
    fn call(&self, object: &str, method: &str, payload: &str) -> Result<(), CallError>;

    /// Tear the instance down. Idempotent; calls after termination fail with
    /// [`CallError::Terminated`].
    fn terminate(&self);
}
