//! # Lifecycle Manager
//!
//! Drives the creation/teardown state machine for the embedded instance and
//! is the sole writer of the bridge's instance handle.
//!
//! ## Commit Rule
//!
//! Every load attempt captures a monotonic id at start. The attempt may
//! publish its instance only if the id still equals the counter at commit
//! time and the manager has not been torn down. Teardown (standalone or the
//! first half of a reload) bumps the counter, so every in-flight attempt
//! self-discards: its fresh instance is terminated, its loader released,
//! and no shared state is touched.
//!
//! ## Reload Guard
//!
//! The re-entrancy flag around `reload` is the only mutual exclusion in the
//! system; it guards exactly the teardown-then-reload critical section.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use gamedock_bridge::MessageBridge;
use shared_types::{EngineInstance, LoadingState};

use crate::config::EngineConfig;
use crate::errors::LifecycleError;
use crate::ports::{EngineProvider, RenderSurface};

/// The live instance and the loader resource it was built from.
struct Current<L> {
    instance: Arc<dyn EngineInstance>,
    loader: L,
}

/// Asynchronous lifecycle of the single embedded instance.
pub struct LifecycleManager<P: EngineProvider> {
    bridge: Arc<MessageBridge>,
    provider: Arc<P>,
    config: EngineConfig,

    /// Authoritative loading state, observable by the presentation layer.
    state_tx: watch::Sender<LoadingState>,

    /// Monotonic load attempt counter; the cancellation primitive.
    attempt: AtomicU64,

    /// Re-entrancy guard for the teardown-then-reload critical section.
    reloading: AtomicBool,

    /// Cleared by [`Self::teardown`]; an inactive manager never publishes.
    active: AtomicBool,

    /// Error of the last failed attempt, for the retry surface.
    last_error: Mutex<Option<LifecycleError>>,

    /// The committed instance and its loader, owned until teardown.
    current: Mutex<Option<Current<P::Loader>>>,
}

impl<P: EngineProvider> LifecycleManager<P> {
    /// Create a manager in the `Idle` state. Nothing loads until
    /// [`Self::load`] is called.
    #[must_use]
    pub fn new(bridge: Arc<MessageBridge>, provider: Arc<P>, config: EngineConfig) -> Self {
        let (state_tx, _) = watch::channel(LoadingState::Idle);
        Self {
            bridge,
            provider,
            config,
            state_tx,
            attempt: AtomicU64::new(0),
            reloading: AtomicBool::new(false),
            active: AtomicBool::new(true),
            last_error: Mutex::new(None),
            current: Mutex::new(None),
        }
    }

    // =========================================================================
    // LOAD
    // =========================================================================

    /// Run one load attempt: acquire the loader, then build an instance
    /// bound to `surface`.
    ///
    /// Returns `Err` only when this attempt failed a phase while still
    /// current; a superseded attempt discards its result silently and
    /// returns `Ok`.
    pub async fn load(&self, surface: &RenderSurface) -> Result<(), LifecycleError> {
        if !self.active.load(Ordering::SeqCst) {
            warn!("Load requested on a torn-down manager; ignoring");
            return Ok(());
        }

        let attempt = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(LoadingState::Loading);
        info!(attempt, surface = surface.id(), "Engine load started");

        // Phase 1: loader resource.
        let loader = match self.provider.acquire_loader(&self.config).await {
            Ok(loader) => loader,
            Err(e) => return self.fail_attempt(attempt, e),
        };
        if self.is_stale(attempt) {
            debug!(attempt, "Load attempt superseded after loader acquisition");
            self.provider.release_loader(loader);
            return Ok(());
        }

        // Phase 2: instance construction.
        let instance = match self.provider.instantiate(&loader, surface, &self.config).await {
            Ok(instance) => instance,
            Err(e) => {
                self.provider.release_loader(loader);
                return self.fail_attempt(attempt, e);
            }
        };

        // Commit rule: only the current attempt of an active manager may
        // publish. Everything else tears its result down on the spot.
        if self.is_stale(attempt) {
            debug!(attempt, "Stale load result discarded");
            instance.terminate();
            self.provider.release_loader(loader);
            return Ok(());
        }

        let previous = self.current.lock().replace(Current {
            instance: Arc::clone(&instance),
            loader,
        });
        if let Some(previous) = previous {
            debug!("Replacing previously committed instance");
            previous.instance.terminate();
            self.provider.release_loader(previous.loader);
        }

        self.bridge.set_instance(instance);
        *self.last_error.lock() = None;
        self.set_state(LoadingState::Ready);
        info!(attempt, "Engine instance ready");
        Ok(())
    }

    fn is_stale(&self, attempt: u64) -> bool {
        self.attempt.load(Ordering::SeqCst) != attempt || !self.active.load(Ordering::SeqCst)
    }

    fn fail_attempt(&self, attempt: u64, error: LifecycleError) -> Result<(), LifecycleError> {
        if self.is_stale(attempt) {
            debug!(attempt, error = %error, "Stale load failure discarded");
            return Ok(());
        }
        warn!(attempt, error = %error, "Engine load failed");
        *self.last_error.lock() = Some(error.clone());
        self.set_state(LoadingState::Error);
        Err(error)
    }

    // =========================================================================
    // RELOAD / TEARDOWN
    // =========================================================================

    /// Tear the current instance down, wait out the settle interval, and
    /// start a fresh load.
    ///
    /// A call while another reload is in flight is a no-op.
    pub async fn reload(&self, surface: &RenderSurface) -> Result<(), LifecycleError> {
        if self.reloading.swap(true, Ordering::SeqCst) {
            debug!("Reload already in flight; ignoring");
            return Ok(());
        }

        info!("Engine reload started");
        self.teardown_current();
        tokio::time::sleep(self.config.reload_settle).await;
        self.set_state(LoadingState::Reloading);
        let result = self.load(surface).await;
        self.reloading.store(false, Ordering::SeqCst);
        result
    }

    /// Mark the manager inactive and tear the current instance down.
    ///
    /// In-flight load attempts self-discard under the commit rule. There is
    /// no way back: later `load` calls are ignored.
    pub fn teardown(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        info!("Lifecycle manager torn down");
        self.teardown_current();
    }

    /// The teardown half shared by `reload` and `teardown`: clear the
    /// bridge, terminate the instance, release the loader, reset to `Idle`.
    /// Bumps the attempt counter so in-flight attempts self-discard.
    fn teardown_current(&self) {
        let current = self.current.lock().take();
        self.bridge.clear_instance();
        if let Some(Current { instance, loader }) = current {
            instance.terminate();
            self.provider.release_loader(loader);
        }
        self.attempt.fetch_add(1, Ordering::SeqCst);
        *self.last_error.lock() = None;
        self.set_state(LoadingState::Idle);
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    fn set_state(&self, state: LoadingState) {
        self.state_tx.send_replace(state);
    }

    /// Current loading state.
    #[must_use]
    pub fn state(&self) -> LoadingState {
        *self.state_tx.borrow()
    }

    /// Watch loading-state transitions (for the presentation layer).
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<LoadingState> {
        self.state_tx.subscribe()
    }

    /// Error of the last failed attempt, if the manager is in `Error`.
    #[must_use]
    pub fn last_error(&self) -> Option<LifecycleError> {
        self.last_error.lock().clone()
    }

    /// Current value of the attempt counter.
    #[must_use]
    pub fn attempt(&self) -> u64 {
        self.attempt.load(Ordering::SeqCst)
    }

    /// Whether the manager has not been torn down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// The engine configuration this manager loads with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
