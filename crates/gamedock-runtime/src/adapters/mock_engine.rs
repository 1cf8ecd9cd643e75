//! # Mock Engine Adapters
//!
//! In-memory implementations of the engine instance and provider ports,
//! used by unit and integration tests across the workspace. The provider
//! can script phase delays and failures, and can announce readiness on the
//! inbound channel the way real engine glue does.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use gamedock_lifecycle::{EngineConfig, EngineProvider, LifecycleError, RenderSurface};
use shared_types::{CallError, EngineInstance, InboundEvent, READY_EVENT};

/// Recording engine instance.
pub struct MockEngine {
    calls: Mutex<Vec<(String, String, String)>>,
    terminated: AtomicBool,
    reject_method: Mutex<Option<String>>,
}

impl MockEngine {
    /// A fresh instance with no recorded calls.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            terminated: AtomicBool::new(false),
            reject_method: Mutex::new(None),
        })
    }

    /// Reject every call to the given method.
    pub fn reject_method(&self, method: impl Into<String>) {
        *self.reject_method.lock() = Some(method.into());
    }

    /// Calls received so far, as `(object, method, payload)`.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().clone()
    }

    /// Whether the instance was terminated.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

impl EngineInstance for MockEngine {
    fn call(&self, object: &str, method: &str, payload: &str) -> Result<(), CallError> {
        if self.is_terminated() {
            return Err(CallError::Terminated);
        }
        if self.reject_method.lock().as_deref() == Some(method) {
            return Err(CallError::Rejected {
                object: object.to_string(),
                method: method.to_string(),
                reason: "scripted rejection".to_string(),
            });
        }
        self.calls
            .lock()
            .push((object.to_string(), method.to_string(), payload.to_string()));
        Ok(())
    }

    fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }
}

/// Loader resource handed out by the mock provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockLoader {
    /// The loader artifact location the resource was bound to.
    pub url: String,
}

/// Scriptable engine provider for tests.
pub struct MockEngineProvider {
    fail_acquire: AtomicBool,
    fail_instantiate: AtomicBool,
    acquire_delay: Mutex<Duration>,
    instantiate_delay: Mutex<Duration>,
    released: AtomicUsize,
    instances: Mutex<Vec<Arc<MockEngine>>>,
    ready_sender: Mutex<Option<mpsc::UnboundedSender<InboundEvent>>>,
}

impl MockEngineProvider {
    /// A provider that succeeds immediately in both phases.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self {
            fail_acquire: AtomicBool::new(false),
            fail_instantiate: AtomicBool::new(false),
            acquire_delay: Mutex::new(Duration::ZERO),
            instantiate_delay: Mutex::new(Duration::ZERO),
            released: AtomicUsize::new(0),
            instances: Mutex::new(Vec::new()),
            ready_sender: Mutex::new(None),
        })
    }

    /// Make phase 1 fail until reset.
    pub fn fail_acquire(&self, fail: bool) {
        self.fail_acquire.store(fail, Ordering::SeqCst);
    }

    /// Make phase 2 fail until reset.
    pub fn fail_instantiate(&self, fail: bool) {
        self.fail_instantiate.store(fail, Ordering::SeqCst);
    }

    /// Delay applied inside phase 1.
    pub fn set_acquire_delay(&self, delay: Duration) {
        *self.acquire_delay.lock() = delay;
    }

    /// Delay applied inside phase 2.
    pub fn set_instantiate_delay(&self, delay: Duration) {
        *self.instantiate_delay.lock() = delay;
    }

    /// Emit a `ready` signal on the given channel after each instantiation,
    /// the way real engine glue announces boot completion.
    pub fn announce_ready_to(&self, sender: mpsc::UnboundedSender<InboundEvent>) {
        *self.ready_sender.lock() = Some(sender);
    }

    /// Every instance built so far, oldest first.
    #[must_use]
    pub fn instances(&self) -> Vec<Arc<MockEngine>> {
        self.instances.lock().clone()
    }

    /// The most recently built instance.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<MockEngine>> {
        self.instances.lock().last().cloned()
    }

    /// Number of loader resources released.
    #[must_use]
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineProvider for MockEngineProvider {
    type Loader = MockLoader;

    async fn acquire_loader(&self, config: &EngineConfig) -> Result<Self::Loader, LifecycleError> {
        let delay = *self.acquire_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(LifecycleError::ResourceLoad {
                url: config.loader_url.clone(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(MockLoader {
            url: config.loader_url.clone(),
        })
    }

    async fn instantiate(
        &self,
        _loader: &Self::Loader,
        _surface: &RenderSurface,
        _config: &EngineConfig,
    ) -> Result<Arc<dyn EngineInstance>, LifecycleError> {
        let delay = *self.instantiate_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_instantiate.load(Ordering::SeqCst) {
            return Err(LifecycleError::InstanceCreation {
                reason: "scripted failure".to_string(),
            });
        }

        let engine = MockEngine::shared();
        self.instances.lock().push(Arc::clone(&engine));

        if let Some(sender) = self.ready_sender.lock().as_ref() {
            let _ = sender.send(InboundEvent::signal(READY_EVENT));
        }

        Ok(engine)
    }

    fn release_loader(&self, _loader: Self::Loader) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
