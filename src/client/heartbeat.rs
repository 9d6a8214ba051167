//! Client-side heartbeat loop.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::client::RegistrationClient;

/// Interval used by `devroute-client`; must stay below the server's heartbeat timeout.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// Send heartbeats every `interval` until shutdown, then unregister.
pub async fn run_heartbeats(
    client: RegistrationClient,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = client.heartbeat().await {
                    tracing::warn!(id = %client.id(), error = %e, "Heartbeat failed");
                }
            }
            _ = shutdown.recv() => break,
        }
    }

    match client.unregister().await {
        Ok(()) => tracing::info!(id = %client.id(), "Unregistered"),
        Err(e) => tracing::warn!(id = %client.id(), error = %e, "Unregister failed"),
    }
}
