//! # Error Types
//!
//! Cross-crate error values. Lifecycle errors live with the lifecycle crate;
//! this module holds the fault type shared by every dispatch boundary.

use thiserror::Error;

/// A fault raised by a subscriber or observer callback.
///
/// Faults are caught at the dispatch boundary, logged, and never allowed to
/// prevent delivery to sibling handlers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    /// Build a fault from any displayable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<&str> for HandlerError {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

impl From<String> for HandlerError {
    fn from(reason: String) -> Self {
        Self(reason)
    }
}
