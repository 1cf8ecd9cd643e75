//! Cross-crate integration scenarios.

pub mod bridge_flow;
pub mod bus_flow;
pub mod lifecycle_flow;
