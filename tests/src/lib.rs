//! # Gamedock Test Suite
//!
//! Unified test crate containing cross-crate integration scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/integration/
//! ├── bridge_flow.rs     # queue flush, readiness, normalization
//! ├── bus_flow.rs        # forwarder refcounting, once, per-type isolation
//! ├── lifecycle_flow.rs  # overlapping loads, reload guard, teardown
//! └── host_flow.rs       # full host context end-to-end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p gamedock-tests
//!
//! # By category
//! cargo test -p gamedock-tests integration::bridge_flow::
//! cargo test -p gamedock-tests integration::host_flow::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
