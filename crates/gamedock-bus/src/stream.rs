//! # Event Stream
//!
//! A stream wrapper over a bus subscription, for host code that prefers
//! `Stream` combinators to callbacks. Dropping the stream detaches its
//! subscription.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

use shared_types::{EventMeta, EventPayload};

use crate::bus::{BusSubscription, EventBus};

/// One event as observed through an [`EventStream`].
#[derive(Debug, Clone)]
pub struct BusEvent {
    /// Normalized payload, shared with every other handler of the event.
    pub payload: Arc<EventPayload>,
    /// Producer-supplied metadata.
    pub meta: EventMeta,
}

impl EventBus {
    /// Subscribe to one event type as a stream.
    ///
    /// The stream buffers without bound while not polled; it ends when the
    /// bus itself goes away.
    #[must_use]
    pub fn stream(&self, event_type: &str) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(
            event_type,
            Arc::new(move |payload, meta| {
                // A closed receiver means the stream was dropped but not yet
                // unsubscribed; nothing to deliver.
                let _ = tx.send(BusEvent {
                    payload,
                    meta: meta.clone(),
                });
                Ok(())
            }),
        );
        EventStream {
            receiver: rx,
            subscription: Some(subscription),
        }
    }
}

/// Stream of events for a single type.
pub struct EventStream {
    receiver: mpsc::UnboundedReceiver<BusEvent>,
    subscription: Option<BusSubscription>,
}

impl EventStream {
    /// The event type this stream observes.
    #[must_use]
    pub fn event_type(&self) -> Option<&str> {
        self.subscription.as_ref().map(BusSubscription::event_type)
    }
}

impl Stream for EventStream {
    type Item = BusEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
