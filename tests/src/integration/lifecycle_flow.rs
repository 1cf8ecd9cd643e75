//! # Lifecycle Flow Tests
//!
//! Creation/teardown against the mock provider:
//!
//! 1. **Stale attempt discard**: of two overlapping loads, only the newer
//!    publishes; the older terminates its own instance.
//! 2. **Reload guard**: a second reload while one is in flight is a no-op.
//! 3. **Error recovery**: a failed load surfaces through the `Error` state
//!    and recovers only via an explicit reload.

#[cfg(test)]
mod tests {
    use gamedock_bridge::MessageBridge;
    use gamedock_lifecycle::{EngineConfig, LifecycleError, LifecycleManager, RenderSurface};
    use gamedock_runtime::adapters::MockEngineProvider;
    use shared_types::LoadingState;
    use std::sync::Arc;
    use std::time::Duration;

    fn setup() -> (
        Arc<MessageBridge>,
        Arc<MockEngineProvider>,
        Arc<LifecycleManager<MockEngineProvider>>,
    ) {
        let bridge = Arc::new(MessageBridge::new());
        let provider = MockEngineProvider::shared();
        let manager = Arc::new(LifecycleManager::new(
            Arc::clone(&bridge),
            Arc::clone(&provider),
            EngineConfig::default(),
        ));
        (bridge, provider, manager)
    }

    fn surface() -> RenderSurface {
        RenderSurface::new("engine-canvas")
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_loads_publish_only_the_newest() {
        let (bridge, provider, manager) = setup();

        provider.set_instantiate_delay(Duration::from_millis(500));
        let slow = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.load(&RenderSurface::new("engine-canvas")).await })
        };
        tokio::task::yield_now().await;

        provider.set_instantiate_delay(Duration::ZERO);
        manager.load(&surface()).await.expect("fast load");
        slow.await.expect("join").expect("slow load discards silently");

        let instances = provider.instances();
        assert_eq!(instances.len(), 2);

        // Exactly one instance survives, and it is the bridge's handle.
        let live: Vec<_> = instances.iter().filter(|i| !i.is_terminated()).collect();
        assert_eq!(live.len(), 1);
        assert!(bridge.has_instance());
        assert_eq!(manager.state(), LoadingState::Ready);

        let handle = bridge.when_ready().await;
        handle.call("Obj", "Ping", "{}").expect("live handle");
        assert_eq!(live[0].calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_reloads_run_one_teardown() {
        let (_bridge, provider, manager) = setup();
        manager.load(&surface()).await.expect("initial load");

        provider.set_instantiate_delay(Duration::from_millis(500));
        let first = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.reload(&RenderSurface::new("engine-canvas")).await })
        };
        tokio::task::yield_now().await;

        // Second reload while the first is in flight: no duplicate teardown.
        manager.reload(&surface()).await.expect("no-op reload");
        assert_eq!(provider.released(), 1);

        first.await.expect("join").expect("reload");
        assert_eq!(provider.released(), 1);
        assert_eq!(provider.instances().len(), 2);
        assert_eq!(manager.state(), LoadingState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_state_recovers_only_via_reload() {
        let (bridge, provider, manager) = setup();

        provider.fail_acquire(true);
        let result = manager.load(&surface()).await;
        assert!(matches!(result, Err(LifecycleError::ResourceLoad { .. })));
        assert_eq!(manager.state(), LoadingState::Error);
        assert!(manager.last_error().is_some());
        assert!(!bridge.has_instance());

        provider.fail_acquire(false);
        manager.reload(&surface()).await.expect("reload");

        assert_eq!(manager.state(), LoadingState::Ready);
        assert!(manager.last_error().is_none());
        assert!(bridge.has_instance());
    }

    #[tokio::test]
    async fn test_state_transitions_are_observable() {
        let (_bridge, _provider, manager) = setup();
        let mut states = manager.watch_state();
        assert_eq!(*states.borrow_and_update(), LoadingState::Idle);

        manager.load(&surface()).await.expect("load");
        assert_eq!(manager.state(), LoadingState::Ready);

        manager.teardown();
        assert_eq!(manager.state(), LoadingState::Idle);
        assert!(!manager.is_active());
    }
}
