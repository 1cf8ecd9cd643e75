//! # Engine Configuration
//!
//! Locations of the engine build artifacts plus product identity and the
//! optional integrity/cross-origin settings. Consumed by the lifecycle
//! manager and its provider; never produced by the core.

use std::time::Duration;

/// Configuration for loading one embedded engine build.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Location of the loader artifact acquired in load phase 1.
    pub loader_url: String,
    /// Location of the engine data artifact.
    pub data_url: String,
    /// Location of the framework artifact.
    pub framework_url: String,
    /// Location of the compiled code artifact.
    pub code_url: String,
    /// Base path for streamed assets.
    pub streaming_assets_url: String,

    /// Publisher identity reported to the engine.
    pub company_name: String,
    /// Product identity reported to the engine.
    pub product_name: String,
    /// Product version reported to the engine.
    pub product_version: String,

    /// Optional integrity hash the provider checks before instantiation.
    pub integrity_hash: Option<String>,
    /// Optional cross-origin policy for artifact fetches.
    pub cross_origin_policy: Option<CrossOriginPolicy>,

    /// Interval waited between teardown and the fresh load during a reload.
    pub reload_settle: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            loader_url: "Build/engine.loader.js".to_string(),
            data_url: "Build/engine.data".to_string(),
            framework_url: "Build/engine.framework.js".to_string(),
            code_url: "Build/engine.wasm".to_string(),
            streaming_assets_url: "StreamingAssets".to_string(),
            company_name: "Gamedock".to_string(),
            product_name: "Gamedock".to_string(),
            product_version: "0.1.0".to_string(),
            integrity_hash: None,
            cross_origin_policy: None,
            reload_settle: Duration::from_millis(100),
        }
    }
}

/// Cross-origin policy applied to artifact fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossOriginPolicy {
    /// Fetch without credentials.
    Anonymous,
    /// Fetch with credentials.
    UseCredentials,
}
