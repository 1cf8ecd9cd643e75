//! # Host Context
//!
//! The one integration point where the bridge, event bus, lifecycle
//! manager, and inbound channel are wired together. Constructed once by the
//! composing application; all host-facing operations go through it.
//!
//! ## Wiring
//!
//! ```text
//! [Engine glue] ──sender──→ [InboundChannel pump] ──→ [Bridge] ──→ [EventBus]
//!                                                        ↑
//! [HostContext::load] ──→ [LifecycleManager] ──set_instance┘
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tracing::info;

use gamedock_bridge::{GlobalObserver, MessageBridge, ObserverId};
use gamedock_bus::{BusHandler, BusSubscription, EventBus, EventStream, SubscriberId};
use gamedock_lifecycle::{
    EngineProvider, LifecycleError, LifecycleManager, RenderSurface,
};
use shared_types::{EngineInstance, InboundEvent, LoadingState, OutboundPayload};

use crate::adapters::channel::InboundChannel;
use crate::container::config::HostConfig;

/// Explicit context owning every shared piece of the embedding core.
pub struct HostContext<P: EngineProvider> {
    bridge: Arc<MessageBridge>,
    bus: Arc<EventBus>,
    lifecycle: Arc<LifecycleManager<P>>,
    surface: RenderSurface,
    channel: Mutex<Option<InboundChannel>>,
}

impl<P: EngineProvider> HostContext<P> {
    /// Wire a context from configuration and an engine provider.
    ///
    /// Spawns the inbound channel pump; must run inside a tokio runtime.
    #[must_use]
    pub fn new(config: HostConfig, provider: Arc<P>) -> Self {
        info!(surface = %config.surface_id, "Initializing host context");

        let bridge = Arc::new(MessageBridge::new());
        let bus = Arc::new(EventBus::new(Arc::clone(&bridge)));
        let lifecycle = Arc::new(LifecycleManager::new(
            Arc::clone(&bridge),
            provider,
            config.engine,
        ));
        let channel = InboundChannel::spawn(Arc::clone(&bridge));

        Self {
            bridge,
            bus,
            lifecycle,
            surface: RenderSurface::new(config.surface_id),
            channel: Mutex::new(Some(channel)),
        }
    }

    // =========================================================================
    // PUBLIC SURFACE (host code)
    // =========================================================================

    /// Send a call to the engine, queueing it while no instance exists.
    pub fn send(
        &self,
        payload: impl Into<OutboundPayload>,
        target_object: &str,
        target_method: &str,
        queue: bool,
    ) -> bool {
        self.bridge
            .send(target_object, target_method, payload.into(), queue)
    }

    /// Subscribe a typed handler.
    pub fn on(&self, event_type: &str, handler: BusHandler) -> BusSubscription {
        self.bus.subscribe(event_type, handler)
    }

    /// Remove a typed handler subscription.
    pub fn off(&self, event_type: &str, id: SubscriberId) -> bool {
        self.bus.unsubscribe(event_type, id)
    }

    /// Subscribe a typed handler that fires at most once.
    pub fn once(&self, event_type: &str, handler: BusHandler) -> BusSubscription {
        self.bus.once(event_type, handler)
    }

    /// Subscribe to one event type as a stream.
    #[must_use]
    pub fn stream(&self, event_type: &str) -> EventStream {
        self.bus.stream(event_type)
    }

    /// Observe every inbound event regardless of type.
    pub fn on_message(&self, observer: GlobalObserver) -> ObserverId {
        self.bridge.register_observer(observer)
    }

    /// Remove a global observer.
    pub fn off_message(&self, id: ObserverId) -> bool {
        self.bridge.unregister_observer(id)
    }

    /// Wait for a live instance handle.
    pub async fn when_ready(&self) -> Arc<dyn EngineInstance> {
        self.bridge.when_ready().await
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Load the engine instance against the configured surface.
    pub async fn load(&self) -> Result<(), LifecycleError> {
        self.lifecycle.load(&self.surface).await
    }

    /// Tear down and load afresh. No-op while another reload is in flight.
    pub async fn reload(&self) -> Result<(), LifecycleError> {
        self.lifecycle.reload(&self.surface).await
    }

    /// Shut the context down: lifecycle teardown plus channel pump stop.
    pub async fn teardown(&self) {
        self.lifecycle.teardown();
        let channel = self.channel.lock().take();
        if let Some(channel) = channel {
            channel.close().await;
        }
        info!("Host context torn down");
    }

    /// Current loading state.
    #[must_use]
    pub fn state(&self) -> LoadingState {
        self.lifecycle.state()
    }

    /// Watch loading-state transitions (for the loading/error overlay).
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<LoadingState> {
        self.lifecycle.watch_state()
    }

    /// Error of the last failed load, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<LifecycleError> {
        self.lifecycle.last_error()
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Sender the engine glue uses to emit events on the shared channel.
    /// `None` once the context is torn down.
    #[must_use]
    pub fn channel_sender(&self) -> Option<mpsc::UnboundedSender<InboundEvent>> {
        self.channel.lock().as_ref().map(InboundChannel::sender)
    }

    /// The underlying message bridge.
    #[must_use]
    pub fn bridge(&self) -> &Arc<MessageBridge> {
        &self.bridge
    }

    /// The typed event bus.
    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// The lifecycle manager.
    #[must_use]
    pub fn lifecycle(&self) -> &Arc<LifecycleManager<P>> {
        &self.lifecycle
    }

    /// The render surface this context loads against.
    #[must_use]
    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }
}
