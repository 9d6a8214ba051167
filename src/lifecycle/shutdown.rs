//! Shutdown coordination.
//!
//! In the server, the signal handler triggers and two tasks listen: the HTTP
//! listener (stops accepting, drains in-flight requests) and the expiry
//! sweeper. `RegistryServer::run` triggers again when serving ends so the
//! sweeper never outlives the listener. `devroute-client` uses the same
//! coordinator to stop its heartbeat loop.

use tokio::sync::broadcast;

/// One-shot stop signal shared by the server's background tasks.
///
/// Clones share the channel, so the signal handler can hold one while the
/// server hands out receivers. Subscribe before triggering: a receiver
/// created afterwards does not see the signal.
#[derive(Debug, Clone)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every current subscriber. Repeated triggers are harmless.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Receivers still alive; drops to zero once the listener and sweeper exit.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
