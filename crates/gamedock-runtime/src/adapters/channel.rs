//! # Inbound Channel Adapter
//!
//! The single named broadcast signal the embedded engine uses to notify the
//! host. The engine glue holds the sender; a pump task forwards every event
//! into the bridge's dispatch path.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use gamedock_bridge::MessageBridge;
use shared_types::InboundEvent;

/// The engine-to-host event channel and its pump task.
pub struct InboundChannel {
    tx: mpsc::UnboundedSender<InboundEvent>,
    pump: JoinHandle<()>,
}

impl InboundChannel {
    /// Open the channel and spawn the pump forwarding into `bridge`.
    #[must_use]
    pub fn spawn(bridge: Arc<MessageBridge>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<InboundEvent>();
        let pump = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                bridge.dispatch_inbound(event);
            }
            debug!("Inbound channel pump stopped");
        });
        Self { tx, pump }
    }

    /// A sender for the engine glue to emit events with.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<InboundEvent> {
        self.tx.clone()
    }

    /// Stop the pump. Outstanding sender clones keep the channel object
    /// alive but their events go nowhere; delivery is best-effort.
    pub async fn close(self) {
        drop(self.tx);
        self.pump.abort();
        let _ = self.pump.await;
    }
}
