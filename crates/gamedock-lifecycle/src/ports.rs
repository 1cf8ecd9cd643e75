//! Outbound port (SPI) for the lifecycle manager.
//!
//! The provider performs the two asynchronous load phases against a real
//! engine runtime; the runtime crate supplies adapters implementing it.

use std::sync::Arc;

use async_trait::async_trait;

use shared_types::EngineInstance;

use crate::config::EngineConfig;
use crate::errors::LifecycleError;

/// The visual surface an instance renders into, identified opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSurface(String);

impl RenderSurface {
    /// Reference a surface by its host-side identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The host-side identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Engine provider interface for the two load phases.
#[async_trait]
pub trait EngineProvider: Send + Sync {
    /// Provider-specific loader resource acquired in phase 1 and released
    /// at teardown (or when an attempt is discarded).
    type Loader: Send + Sync + 'static;

    /// Phase 1: acquire the loader resource bound to the configured
    /// artifact locations.
    async fn acquire_loader(&self, config: &EngineConfig) -> Result<Self::Loader, LifecycleError>;

    /// Phase 2: construct an instance bound to the given surface.
    async fn instantiate(
        &self,
        loader: &Self::Loader,
        surface: &RenderSurface,
        config: &EngineConfig,
    ) -> Result<Arc<dyn EngineInstance>, LifecycleError>;

    /// Release a loader resource. Called for the live loader at teardown
    /// and for the loader of every discarded attempt.
    fn release_loader(&self, loader: Self::Loader);
}
