//! # Bus Flow Tests
//!
//! Reference-counted forwarder activation over a live bridge: exactly one
//! global observer regardless of subscriber count, removed when the last
//! subscriber leaves, and per-type delivery isolation.

#[cfg(test)]
mod tests {
    use gamedock_bridge::MessageBridge;
    use gamedock_bus::EventBus;
    use parking_lot::Mutex;
    use serde_json::json;
    use shared_types::{EventPayload, InboundEvent};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    fn counting(hits: &Arc<Mutex<u32>>) -> gamedock_bus::BusHandler {
        let hits = Arc::clone(hits);
        Arc::new(move |_, _| {
            *hits.lock() += 1;
            Ok(())
        })
    }

    #[test]
    fn test_subscribe_then_unsubscribe_leaves_no_forwarder() {
        let bridge = Arc::new(MessageBridge::new());
        let bus = EventBus::new(Arc::clone(&bridge));
        let hits = Arc::new(Mutex::new(0));

        let sub = bus.subscribe("GameResult", counting(&hits));
        assert_eq!(bridge.observer_count(), 1);

        assert!(sub.unsubscribe());
        assert_eq!(bridge.observer_count(), 0);

        // With no forwarder, dispatches no longer reach the bus.
        bridge.dispatch_inbound(InboundEvent::with_payload("GameResult", "{}"));
        assert_eq!(*hits.lock(), 0);
    }

    #[test]
    fn test_two_types_unsubscribing_one_keeps_the_other_live() {
        let bridge = Arc::new(MessageBridge::new());
        let bus = EventBus::new(Arc::clone(&bridge));
        let ready_hits = Arc::new(Mutex::new(0));
        let result_hits = Arc::new(Mutex::new(0));

        let ready_sub = bus.subscribe("ready", counting(&ready_hits));
        let _result_sub = bus.subscribe("GameResult", counting(&result_hits));
        assert_eq!(bridge.observer_count(), 1);

        assert!(ready_sub.unsubscribe());
        assert_eq!(bridge.observer_count(), 1);

        bridge.dispatch_inbound(InboundEvent::signal("ready"));
        bridge.dispatch_inbound(InboundEvent::with_payload("GameResult", r#"{"score":3}"#));

        assert_eq!(*ready_hits.lock(), 0);
        assert_eq!(*result_hits.lock(), 1);
    }

    #[test]
    fn test_once_fires_exactly_once_across_two_dispatches() {
        let bridge = Arc::new(MessageBridge::new());
        let bus = EventBus::new(Arc::clone(&bridge));
        let hits = Arc::new(Mutex::new(0));

        let _sub = bus.once("GameResult", counting(&hits));

        bridge.dispatch_inbound(InboundEvent::with_payload("GameResult", "{}"));
        bridge.dispatch_inbound(InboundEvent::with_payload("GameResult", "{}"));

        assert_eq!(*hits.lock(), 1);
        assert_eq!(bridge.observer_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_over_live_bridge() {
        let bridge = Arc::new(MessageBridge::new());
        let bus = EventBus::new(Arc::clone(&bridge));

        let mut stream = bus.stream("GameResult");
        bridge.dispatch_inbound(InboundEvent::with_payload("GameResult", r#"{"score":10}"#));
        bridge.dispatch_inbound(InboundEvent::with_payload("GameResult", r#"{"score":11}"#));

        let first = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("event");
        let second = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("event");

        assert_eq!(*first.payload, EventPayload::Json(json!({"score": 10})));
        assert_eq!(*second.payload, EventPayload::Json(json!({"score": 11})));

        drop(stream);
        assert_eq!(bridge.observer_count(), 0);
    }

    #[test]
    fn test_faulty_subscriber_isolated_from_siblings_and_observers() {
        let bridge = Arc::new(MessageBridge::new());
        let bus = EventBus::new(Arc::clone(&bridge));
        let hits = Arc::new(Mutex::new(0));
        let observed = Arc::new(Mutex::new(0));

        let _bad = bus.subscribe("GameResult", Arc::new(|_, _| Err("subscriber fault".into())));
        let _good = bus.subscribe("GameResult", counting(&hits));
        {
            let observed = Arc::clone(&observed);
            bridge.register_observer(Arc::new(move |_, _, _| {
                *observed.lock() += 1;
                Ok(())
            }));
        }

        bridge.dispatch_inbound(InboundEvent::with_payload("GameResult", "{}"));

        assert_eq!(*hits.lock(), 1);
        assert_eq!(*observed.lock(), 1);
    }
}
