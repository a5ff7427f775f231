use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::{info, warn};

use botdash_types::events::GatewayEvent;

use crate::client::ChatClient;

/// Shared view of the platform session. The session driver writes to it,
/// API handlers read from it through [`ChatClient`].
#[derive(Clone)]
pub struct GatewayHandle {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    ready: AtomicBool,
    /// Set on the first handshake, never cleared
    initialized: AtomicBool,
    guilds: AtomicU64,
    latency_ms: AtomicI64,

    /// Lifecycle events; the session driver listens here for restart requests
    events_tx: broadcast::Sender<GatewayEvent>,
}

impl GatewayHandle {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(GatewayInner {
                ready: AtomicBool::new(false),
                initialized: AtomicBool::new(false),
                guilds: AtomicU64::new(0),
                latency_ms: AtomicI64::new(0),
                events_tx,
            }),
        }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Record a completed handshake.
    pub fn mark_ready(&self, guilds: u64, latency_ms: i64) {
        self.inner.guilds.store(guilds, Ordering::Relaxed);
        self.inner.latency_ms.store(latency_ms, Ordering::Relaxed);
        self.inner.ready.store(true, Ordering::Release);
        self.inner.initialized.store(true, Ordering::Release);
        info!("Gateway ready: {} guilds, {}ms", guilds, latency_ms);

        let _ = self.inner.events_tx.send(GatewayEvent::Ready { guilds, latency_ms });
    }

    pub fn record_latency(&self, latency_ms: i64) {
        self.inner.latency_ms.store(latency_ms, Ordering::Relaxed);
    }

    pub fn mark_disconnected(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.inner.ready.store(false, Ordering::Release);
        warn!("Gateway disconnected: {}", reason);

        let _ = self.inner.events_tx.send(GatewayEvent::Disconnected { reason });
    }
}

impl Default for GatewayHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatClient for GatewayHandle {
    fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    fn has_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::Acquire)
    }

    fn guild_count(&self) -> u64 {
        self.inner.guilds.load(Ordering::Relaxed)
    }

    fn latency_ms(&self) -> i64 {
        self.inner.latency_ms.load(Ordering::Relaxed)
    }

    fn request_restart(&self) -> anyhow::Result<()> {
        self.inner
            .events_tx
            .send(GatewayEvent::RestartRequested)
            .map_err(|_| anyhow::anyhow!("No gateway session is listening for restarts"))?;
        Ok(())
    }
}
