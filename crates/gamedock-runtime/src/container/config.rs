//! # Host Configuration
//!
//! Unified configuration consumed by the host context: the engine build
//! configuration plus the surface the instance renders into.

use gamedock_lifecycle::EngineConfig;

/// Complete host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Engine build artifacts, product identity, and reload settle.
    pub engine: EngineConfig,
    /// Host-side identifier of the render surface.
    pub surface_id: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            surface_id: "engine-canvas".to_string(),
        }
    }
}
