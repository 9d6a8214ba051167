//! Periodic eviction of clients that stopped sending heartbeats.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::observability::metrics;
use crate::registry::Registry;
use crate::routing::ConfigPublisher;

pub struct ExpirySweeper {
    registry: Arc<Registry>,
    publisher: Arc<ConfigPublisher>,
    interval: Duration,
    timeout: Duration,
}

impl ExpirySweeper {
    pub fn new(
        registry: Arc<Registry>,
        publisher: Arc<ConfigPublisher>,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            publisher,
            interval,
            timeout,
        }
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = ?self.interval,
            heartbeat_timeout = ?self.timeout,
            "Expiry sweeper starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Expiry sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One sweep: evict lapsed clients and regenerate the artifact if needed.
    pub async fn sweep_once(&self) -> Vec<String> {
        let expired = self.registry.expire_stale(Utc::now(), self.timeout);
        if expired.is_empty() {
            return expired;
        }

        for id in &expired {
            tracing::info!(id = %id, "Client expired (no heartbeat)");
        }
        metrics::record_expired(expired.len());

        self.publisher.regenerate(&self.registry).await;
        expired
    }
}
