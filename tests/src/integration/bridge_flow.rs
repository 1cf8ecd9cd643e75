//! # Bridge Flow Tests
//!
//! Exercises the bridge's three guarantees end to end:
//!
//! 1. **Queue ordering**: sends issued before a handle exists are delivered
//!    in issue order, exactly once, when the handle is installed.
//! 2. **Readiness identity**: waiters before and after installation resolve
//!    to the identical handle; clearing resets the wait.
//! 3. **Normalization**: every handler of one event observes one normalized
//!    payload.

#[cfg(test)]
mod tests {
    use gamedock_bridge::MessageBridge;
    use gamedock_runtime::adapters::MockEngine;
    use parking_lot::Mutex;
    use serde_json::json;
    use shared_types::{EventPayload, InboundEvent};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_queued_sends_flush_in_issue_order_and_count() {
        let bridge = MessageBridge::new();

        for i in 0..10 {
            assert!(bridge.send("Obj", &format!("Method{i}"), format!("{i}").into(), true));
        }
        assert_eq!(bridge.queue_len(), 10);

        let engine = MockEngine::shared();
        bridge.set_instance(engine.clone());

        let calls = engine.calls();
        assert_eq!(calls.len(), 10);
        for (i, (_, method, payload)) in calls.iter().enumerate() {
            assert_eq!(method, &format!("Method{i}"));
            assert_eq!(payload, &format!("{i}"));
        }
        assert_eq!(bridge.queue_len(), 0);
        assert_eq!(bridge.messages_sent(), 10);
    }

    #[test]
    fn test_flush_count_matches_arbitrary_queue_depth() {
        use rand::Rng;
        let depth = rand::thread_rng().gen_range(1..64);

        let bridge = MessageBridge::new();
        for i in 0..depth {
            bridge.send("Obj", "Tick", format!("{i}").into(), true);
        }

        let engine = MockEngine::shared();
        bridge.set_instance(engine.clone());

        assert_eq!(engine.calls().len(), depth);
        assert_eq!(bridge.messages_sent(), depth as u64);
        assert_eq!(bridge.queue_len(), 0);
    }

    #[tokio::test]
    async fn test_when_ready_identity_and_reset() {
        let bridge = Arc::new(MessageBridge::new());

        let early = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.when_ready().await })
        };

        let engine = MockEngine::shared();
        bridge.set_instance(engine.clone());

        let before = early.await.expect("early waiter");
        let after = bridge.when_ready().await;
        assert!(Arc::ptr_eq(&before, &after));

        bridge.clear_instance();
        let pending = timeout(Duration::from_millis(50), bridge.when_ready()).await;
        assert!(pending.is_err(), "wait must reset after clear");

        // The next handle resolves the fresh wait.
        let replacement = MockEngine::shared();
        bridge.set_instance(replacement);
        let resolved = bridge.when_ready().await;
        assert!(!Arc::ptr_eq(&before, &resolved));
    }

    #[test]
    fn test_payload_normalization_is_shared_and_best_effort() {
        let bridge = MessageBridge::new();
        let seen: Arc<Mutex<Vec<Arc<EventPayload>>>> = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..3 {
            let sink = Arc::clone(&seen);
            bridge.register_handler(
                "result",
                Arc::new(move |payload, _| {
                    sink.lock().push(payload);
                    Ok(())
                }),
            );
        }

        bridge.dispatch_inbound(InboundEvent::with_payload("result", r#"{"a":1}"#));
        bridge.dispatch_inbound(InboundEvent::with_payload("result", "not-json"));

        let seen = seen.lock();
        assert_eq!(seen.len(), 6);
        // First event: one parsed value, shared by all three handlers.
        assert_eq!(*seen[0], EventPayload::Json(json!({"a": 1})));
        assert!(Arc::ptr_eq(&seen[0], &seen[1]));
        assert!(Arc::ptr_eq(&seen[1], &seen[2]));
        // Second event: unparseable text retained unchanged.
        assert_eq!(*seen[3], EventPayload::Text("not-json".to_string()));
    }

    #[test]
    fn test_start_round_send_scenario() {
        let bridge = MessageBridge::new();

        assert!(bridge.send(
            "JSEventManager",
            "OnStartRound",
            json!({"userId": "user-123"}).into(),
            true,
        ));

        let engine = MockEngine::shared();
        bridge.set_instance(engine.clone());

        assert_eq!(
            engine.calls(),
            vec![(
                "JSEventManager".to_string(),
                "OnStartRound".to_string(),
                r#"{"userId":"user-123"}"#.to_string()
            )]
        );
    }

    #[test]
    fn test_game_result_dispatch_scenario() {
        let bridge = MessageBridge::new();
        let results: Arc<Mutex<Vec<Arc<EventPayload>>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&results);
        bridge.register_handler(
            "GameResult",
            Arc::new(move |payload, _| {
                sink.lock().push(payload);
                Ok(())
            }),
        );

        bridge.dispatch_inbound(InboundEvent::with_payload("GameResult", r#"{"score":10}"#));

        let results = results.lock();
        assert_eq!(results.len(), 1);
        assert_eq!(*results[0], EventPayload::Json(json!({"score": 10})));
    }
}
