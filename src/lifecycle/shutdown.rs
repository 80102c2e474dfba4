//! In-process stop switch for the gateway.
//!
//! `main` owns one [`Shutdown`] and hands a receiver to `lifecycle::start`,
//! which passes it to `HttpServer::run`. There it races the OS signals in a
//! `select!`; whichever fires first starts axum's graceful shutdown, which
//! stops accepting connections and lets in-flight upstream calls finish.
//! Integration tests use [`Shutdown::trigger`] to stop a gateway they spawned.

use tokio::sync::broadcast;

/// Owner of the stop switch. Dropping it stops subscribed servers too.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        // One slot: the only message ever sent is "stop"
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver for one server instance.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed server to drain and stop.
    pub fn trigger(&self) {
        match self.tx.send(()) {
            Ok(servers) => tracing::info!(servers, "Shutdown requested"),
            Err(_) => tracing::debug!("Shutdown requested with no running server"),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();

        shutdown.trigger();

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_drop_closes_receivers() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        drop(shutdown);

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[test]
    fn test_trigger_without_subscribers() {
        // Must not panic when nobody listens
        Shutdown::default().trigger();
    }
}
