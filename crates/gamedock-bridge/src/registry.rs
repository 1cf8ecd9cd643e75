//! # Handler Registries
//!
//! Per-type handler sets and the global observer set. Registration hands out
//! monotonic ids; unregistration is by id. Empty per-type entries are
//! removed, never retained.

use std::collections::HashMap;
use std::sync::Arc;

use shared_types::{EventMeta, EventPayload, HandlerError};

/// Callback invoked for inbound events of one registered type.
pub type InboundHandler =
    Arc<dyn Fn(Arc<EventPayload>, &EventMeta) -> Result<(), HandlerError> + Send + Sync>;

/// Callback invoked for every inbound event regardless of type.
pub type GlobalObserver =
    Arc<dyn Fn(&str, Arc<EventPayload>, &EventMeta) -> Result<(), HandlerError> + Send + Sync>;

/// Identifies one per-type handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Identifies one global observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of typed handlers and global observers.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    typed: HashMap<String, Vec<(HandlerId, InboundHandler)>>,
    observers: Vec<(ObserverId, GlobalObserver)>,
    next_id: u64,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn insert_handler(&mut self, event_type: &str, handler: InboundHandler) -> HandlerId {
        let id = HandlerId(self.next_id());
        self.typed
            .entry(event_type.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    /// Remove a handler by id. Drops the type entry when it becomes empty.
    pub fn remove_handler(&mut self, event_type: &str, id: HandlerId) -> bool {
        let Some(handlers) = self.typed.get_mut(event_type) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        let removed = handlers.len() < before;
        if handlers.is_empty() {
            self.typed.remove(event_type);
        }
        removed
    }

    pub fn insert_observer(&mut self, observer: GlobalObserver) -> ObserverId {
        let id = ObserverId(self.next_id());
        self.observers.push((id, observer));
        id
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() < before
    }

    /// Snapshot the handlers for one type. Dispatch runs on the snapshot so
    /// callbacks may re-enter the registry without holding its lock.
    pub fn handlers_for(&self, event_type: &str) -> Vec<(HandlerId, InboundHandler)> {
        self.typed.get(event_type).cloned().unwrap_or_default()
    }

    /// Snapshot the global observer set.
    pub fn observers(&self) -> Vec<(ObserverId, GlobalObserver)> {
        self.observers.clone()
    }

    pub fn handler_type_count(&self) -> usize {
        self.typed.len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
