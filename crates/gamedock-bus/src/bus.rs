//! # Event Bus
//!
//! Per-type subscriber sets behind a single bridge observer. The forwarder
//! is installed lazily and removed when the bus drains; empty per-type
//! entries are never retained.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, warn};

use gamedock_bridge::{MessageBridge, ObserverId};
use shared_types::{EventMeta, EventPayload, HandlerError};

/// Callback invoked with the normalized payload and metadata of one event.
pub type BusHandler =
    Arc<dyn Fn(Arc<EventPayload>, &EventMeta) -> Result<(), HandlerError> + Send + Sync>;

/// Identifies one bus subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Per-type subscriber sets plus forwarder bookkeeping.
#[derive(Default)]
struct BusInner {
    subscribers: HashMap<String, Vec<(SubscriberId, BusHandler)>>,
    total: usize,
    forwarder: Option<ObserverId>,
    next_id: u64,
}

impl BusInner {
    fn insert(&mut self, event_type: &str, handler: BusHandler) -> SubscriberId {
        self.next_id += 1;
        let id = SubscriberId(self.next_id);
        self.subscribers
            .entry(event_type.to_string())
            .or_default()
            .push((id, handler));
        self.total += 1;
        id
    }

    fn remove(&mut self, event_type: &str, id: SubscriberId) -> bool {
        let Some(handlers) = self.subscribers.get_mut(event_type) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(subscriber_id, _)| *subscriber_id != id);
        let removed = before - handlers.len();
        if handlers.is_empty() {
            self.subscribers.remove(event_type);
        }
        self.total -= removed;
        removed > 0
    }

    fn snapshot(&self, event_type: &str) -> Vec<(SubscriberId, BusHandler)> {
        self.subscribers
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Install or remove the bridge forwarder to match the subscriber count.
    /// Idempotent in both directions.
    fn sync_forwarder(&mut self, bus_inner: &Weak<Mutex<BusInner>>, bridge: &MessageBridge) {
        if self.total > 0 && self.forwarder.is_none() {
            let inner = Weak::clone(bus_inner);
            let id = bridge.register_observer(Arc::new(move |event_type, payload, meta| {
                forward(&inner, event_type, payload, meta);
                Ok(())
            }));
            self.forwarder = Some(id);
            debug!("Event bus forwarder installed");
        } else if self.total == 0 {
            if let Some(id) = self.forwarder.take() {
                bridge.unregister_observer(id);
                debug!("Event bus forwarder removed");
            }
        }
    }
}

/// Re-dispatch one bridge event to the subscribers of its type.
fn forward(
    inner: &Weak<Mutex<BusInner>>,
    event_type: &str,
    payload: Arc<EventPayload>,
    meta: &EventMeta,
) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    // Snapshot before invoking, so subscribers may (un)subscribe freely.
    let handlers = inner.lock().snapshot(event_type);
    for (id, handler) in handlers {
        if let Err(fault) = handler(Arc::clone(&payload), meta) {
            warn!(
                event_type,
                subscriber = ?id,
                error = %fault,
                "Subscriber fault isolated"
            );
        }
    }
}

/// Typed demultiplexer over the bridge's global observer channel.
pub struct EventBus {
    bridge: Arc<MessageBridge>,
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    /// Create a bus over the given bridge. No forwarder is installed until
    /// the first subscription.
    #[must_use]
    pub fn new(bridge: Arc<MessageBridge>) -> Self {
        Self {
            bridge,
            inner: Arc::new(Mutex::new(BusInner::default())),
        }
    }

    /// Subscribe a handler to one event type.
    ///
    /// The first subscription anywhere in the bus installs the single
    /// global forwarder into the bridge.
    pub fn subscribe(&self, event_type: &str, handler: BusHandler) -> BusSubscription {
        let mut inner = self.inner.lock();
        let id = inner.insert(event_type, handler);
        inner.sync_forwarder(&Arc::downgrade(&self.inner), &self.bridge);
        BusSubscription {
            event_type: event_type.to_string(),
            id,
            inner: Arc::downgrade(&self.inner),
            bridge: Arc::clone(&self.bridge),
        }
    }

    /// Subscribe a handler that fires at most once.
    ///
    /// The subscription is removed before the wrapped handler runs, so a
    /// fault still detaches it; the fault itself flows to the normal
    /// isolation policy.
    pub fn once(&self, event_type: &str, handler: BusHandler) -> BusSubscription {
        let slot: Arc<Mutex<Option<SubscriberId>>> = Arc::new(Mutex::new(None));
        let fired = Arc::new(AtomicBool::new(false));

        let wrapper: BusHandler = {
            let slot = Arc::clone(&slot);
            let inner = Arc::downgrade(&self.inner);
            let bridge = Arc::clone(&self.bridge);
            let event_type = event_type.to_string();
            Arc::new(move |payload, meta| {
                if fired.swap(true, Ordering::SeqCst) {
                    return Ok(());
                }
                if let (Some(inner), Some(id)) = (inner.upgrade(), *slot.lock()) {
                    let mut inner = inner.lock();
                    inner.remove(&event_type, id);
                    inner.sync_forwarder(&Weak::new(), &bridge);
                }
                handler(payload, meta)
            })
        };

        let subscription = self.subscribe(event_type, wrapper);
        *slot.lock() = Some(subscription.id);
        subscription
    }

    /// Remove one subscription. Returns whether it existed. Uninstalls the
    /// forwarder when the bus drains.
    pub fn unsubscribe(&self, event_type: &str, id: SubscriberId) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.remove(event_type, id);
        inner.sync_forwarder(&Arc::downgrade(&self.inner), &self.bridge);
        removed
    }

    /// Remove every subscriber for one event type.
    pub fn clear(&self, event_type: &str) {
        let mut inner = self.inner.lock();
        if let Some(handlers) = inner.subscribers.remove(event_type) {
            inner.total -= handlers.len();
        }
        inner.sync_forwarder(&Arc::downgrade(&self.inner), &self.bridge);
    }

    /// Remove every subscriber in the bus.
    pub fn clear_all(&self) {
        let mut inner = self.inner.lock();
        inner.subscribers.clear();
        inner.total = 0;
        inner.sync_forwarder(&Arc::downgrade(&self.inner), &self.bridge);
    }

    /// Total subscriber count across all types.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().total
    }

    /// Whether the global forwarder is currently installed in the bridge.
    #[must_use]
    pub fn forwarder_installed(&self) -> bool {
        self.inner.lock().forwarder.is_some()
    }
}

/// Handle to one subscription, able to detach it explicitly.
///
/// Dropping the handle leaves the subscription active; detaching is always
/// an explicit call.
pub struct BusSubscription {
    event_type: String,
    id: SubscriberId,
    inner: Weak<Mutex<BusInner>>,
    bridge: Arc<MessageBridge>,
}

impl BusSubscription {
    /// Detach the subscription. Returns whether it was still attached.
    pub fn unsubscribe(self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let mut inner = inner.lock();
        let removed = inner.remove(&self.event_type, self.id);
        inner.sync_forwarder(&Weak::new(), &self.bridge);
        removed
    }

    /// The event type this subscription listens to.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The subscription's id, usable with [`EventBus::unsubscribe`].
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }
}
