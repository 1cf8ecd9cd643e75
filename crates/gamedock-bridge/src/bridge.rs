//! # Message Bridge
//!
//! The single seam between host code and the embedded engine instance.
//!
//! ## Responsibilities
//!
//! - Own the one live [`EngineInstance`] handle.
//! - Queue outbound calls issued before a handle exists and flush them in
//!   FIFO order when one is installed.
//! - Normalize inbound payloads once per event and fan them out to typed
//!   handlers and global observers with per-invocation fault isolation.
//! - Expose a readiness signal that resolves once per handle lifetime.
//!
//! ## Thread Safety
//!
//! The bridge is shared via `Arc`. Registry and queue locks are held only
//! for map mutation, never across an engine call or a handler invocation, so
//! callbacks may re-enter the bridge freely.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, warn};

use shared_types::{EngineInstance, EventPayload, InboundEvent, OutboundMessage, OutboundPayload};

use crate::registry::{GlobalObserver, HandlerId, HandlerRegistry, InboundHandler, ObserverId};

/// Instance handle plus the queue of calls awaiting one.
#[derive(Default)]
struct ChannelState {
    instance: Option<Arc<dyn EngineInstance>>,
    queue: VecDeque<OutboundMessage>,
}

/// The message bridge. One per embedded instance slot; constructed once by
/// the composing application and shared by reference.
pub struct MessageBridge {
    /// Handle and outbound queue, mutated together.
    state: Mutex<ChannelState>,

    /// Typed handler and global observer registries.
    registry: RwLock<HandlerRegistry>,

    /// Readiness signal. `Some` exactly while a handle is installed.
    ready_tx: watch::Sender<Option<Arc<dyn EngineInstance>>>,

    /// Calls delivered to a live instance.
    messages_sent: AtomicU64,
    /// Calls captured in the queue.
    messages_queued: AtomicU64,
    /// Calls dropped: flush failures plus queue discards on clear.
    messages_dropped: AtomicU64,
    /// Inbound events dispatched.
    events_dispatched: AtomicU64,
}

impl MessageBridge {
    /// Create a bridge with no instance and an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (ready_tx, _) = watch::channel(None);
        Self {
            state: Mutex::new(ChannelState::default()),
            registry: RwLock::new(HandlerRegistry::default()),
            ready_tx,
            messages_sent: AtomicU64::new(0),
            messages_queued: AtomicU64::new(0),
            messages_dropped: AtomicU64::new(0),
            events_dispatched: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // INSTANCE OWNERSHIP (lifecycle manager only)
    // =========================================================================

    /// Install the instance handle and flush the outbound queue.
    ///
    /// Queued messages are attempted in FIFO order, each independently: a
    /// failed item is logged and skipped, never aborting the remaining
    /// flush. The queue is empty afterwards either way. Resolves the
    /// readiness signal for the new handle lifetime.
    pub fn set_instance(&self, handle: Arc<dyn EngineInstance>) {
        let pending: Vec<OutboundMessage> = {
            let mut state = self.state.lock();
            state.instance = Some(Arc::clone(&handle));
            state.queue.drain(..).collect()
        };

        let total = pending.len();
        let mut delivered = 0usize;
        for msg in pending {
            match handle.call(&msg.target_object, &msg.target_method, &msg.payload) {
                Ok(()) => {
                    delivered += 1;
                    self.messages_sent.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    self.messages_dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        target_object = %msg.target_object,
                        target_method = %msg.target_method,
                        error = %e,
                        "Queued message dropped during flush"
                    );
                }
            }
        }

        if total > 0 {
            debug!(delivered, total, "Outbound queue flushed");
        }

        self.ready_tx.send_replace(Some(handle));
    }

    /// Drop the instance handle and discard the queue without redelivery.
    ///
    /// Resets the readiness signal so later [`Self::when_ready`] callers
    /// wait for the next handle.
    pub fn clear_instance(&self) {
        let discarded = {
            let mut state = self.state.lock();
            state.instance = None;
            let discarded = state.queue.len();
            state.queue.clear();
            discarded
        };

        if discarded > 0 {
            self.messages_dropped
                .fetch_add(discarded as u64, Ordering::Relaxed);
            warn!(discarded, "Outbound queue discarded on instance clear");
        }

        self.ready_tx.send_replace(None);
    }

    // =========================================================================
    // OUTBOUND
    // =========================================================================

    /// Send a call to the engine, queueing it if no handle exists.
    ///
    /// Returns `true` when the call was delivered or queued, `false` when it
    /// was dropped (call failure, or no handle with `queue` disabled).
    /// Never panics and never surfaces an error to the caller.
    pub fn send(
        &self,
        target_object: &str,
        target_method: &str,
        payload: OutboundPayload,
        queue: bool,
    ) -> bool {
        let mut state = self.state.lock();
        match state.instance.as_ref().map(Arc::clone) {
            Some(instance) => {
                drop(state);
                let wire = payload.into_wire();
                match instance.call(target_object, target_method, &wire) {
                    Ok(()) => {
                        self.messages_sent.fetch_add(1, Ordering::Relaxed);
                        true
                    }
                    Err(e) => {
                        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            target_object,
                            target_method,
                            error = %e,
                            "Engine call failed"
                        );
                        false
                    }
                }
            }
            None if queue => {
                state
                    .queue
                    .push_back(OutboundMessage::new(target_object, target_method, payload));
                self.messages_queued.fetch_add(1, Ordering::Relaxed);
                debug!(target_object, target_method, "Message queued (no instance)");
                true
            }
            None => {
                debug!(
                    target_object,
                    target_method, "Message dropped (no instance, queueing disabled)"
                );
                false
            }
        }
    }

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Register a handler for one event type.
    pub fn register_handler(&self, event_type: &str, handler: InboundHandler) -> HandlerId {
        self.registry.write().insert_handler(event_type, handler)
    }

    /// Remove a handler registration. Returns whether it existed.
    pub fn unregister_handler(&self, event_type: &str, id: HandlerId) -> bool {
        self.registry.write().remove_handler(event_type, id)
    }

    /// Register an observer invoked for every inbound event.
    pub fn register_observer(&self, observer: GlobalObserver) -> ObserverId {
        self.registry.write().insert_observer(observer)
    }

    /// Remove an observer registration. Returns whether it existed.
    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.registry.write().remove_observer(id)
    }

    /// Dispatch one inbound event to typed handlers, then global observers.
    ///
    /// The payload is normalized exactly once; every callback observes the
    /// identical normalized value. Each invocation is isolated: a fault is
    /// logged and the remaining callbacks still run.
    pub fn dispatch_inbound(&self, event: InboundEvent) {
        let payload = Arc::new(EventPayload::normalize(event.payload.as_deref()));

        // Dispatch runs on a snapshot so callbacks may (un)register without
        // deadlocking on the registry lock.
        let (handlers, observers) = {
            let registry = self.registry.read();
            (
                registry.handlers_for(&event.event_type),
                registry.observers(),
            )
        };

        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
        debug!(
            event_type = %event.event_type,
            handlers = handlers.len(),
            observers = observers.len(),
            "Dispatching inbound event"
        );

        for (id, handler) in handlers {
            if let Err(fault) = handler(Arc::clone(&payload), &event.meta) {
                warn!(
                    event_type = %event.event_type,
                    handler = ?id,
                    error = %fault,
                    "Handler fault isolated"
                );
            }
        }

        for (id, observer) in observers {
            if let Err(fault) = observer(&event.event_type, Arc::clone(&payload), &event.meta) {
                warn!(
                    event_type = %event.event_type,
                    observer = ?id,
                    error = %fault,
                    "Observer fault isolated"
                );
            }
        }
    }

    // =========================================================================
    // READINESS
    // =========================================================================

    /// Wait for an instance handle.
    ///
    /// Resolves immediately when a handle is installed; otherwise waits on
    /// the shared readiness signal. All concurrent waiters resolve to the
    /// same handle.
    pub async fn when_ready(&self) -> Arc<dyn EngineInstance> {
        let mut rx = self.ready_tx.subscribe();
        loop {
            if let Some(handle) = rx.borrow_and_update().as_ref() {
                return Arc::clone(handle);
            }
            // The bridge owns the sender, so the channel stays open for as
            // long as this future can be polled.
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Whether an instance handle is currently installed.
    #[must_use]
    pub fn has_instance(&self) -> bool {
        self.state.lock().instance.is_some()
    }

    /// Number of messages currently queued.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Total calls delivered to a live instance.
    #[must_use]
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    /// Total calls captured in the queue.
    #[must_use]
    pub fn messages_queued(&self) -> u64 {
        self.messages_queued.load(Ordering::Relaxed)
    }

    /// Total calls dropped (flush failures and queue discards).
    #[must_use]
    pub fn messages_dropped(&self) -> u64 {
        self.messages_dropped.load(Ordering::Relaxed)
    }

    /// Total inbound events dispatched.
    #[must_use]
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }

    /// Number of event types with at least one registered handler.
    #[must_use]
    pub fn handler_type_count(&self) -> usize {
        self.registry.read().handler_type_count()
    }

    /// Number of registered global observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.registry.read().observer_count()
    }
}

impl Default for MessageBridge {
    fn default() -> Self {
        Self::new()
    }
}
