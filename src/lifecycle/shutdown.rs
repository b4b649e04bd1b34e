//! Stop signal shared between the server and whoever owns its lifetime.
//!
//! Backed by a `watch` channel holding a single flag, so a task that
//! subscribes after the trigger still observes it.

use tokio::sync::watch;

/// Owner side: clone it freely, any clone can stop the server.
#[derive(Debug, Clone)]
pub struct Shutdown {
    flag: watch::Sender<bool>,
}

/// Listener side, handed to `Server::run`.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    flag: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self { flag }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            flag: self.flag.subscribe(),
        }
    }

    /// Request a stop. Idempotent, and valid with no subscribers.
    pub fn trigger(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.flag.borrow()
    }

    /// Number of live `ShutdownSignal`s.
    pub fn receiver_count(&self) -> usize {
        self.flag.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once a stop has been requested, or when every `Shutdown`
    /// handle is gone.
    pub async fn recv(mut self) {
        let _ = self.flag.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn subscribers_see_trigger() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 1);
        shutdown.clone().trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn late_subscriber_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        assert!(shutdown.is_triggered());
        tokio::time::timeout(Duration::from_secs(1), shutdown.subscribe().recv())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pending_until_triggered() {
        let shutdown = Shutdown::new();
        let pending = tokio::time::timeout(Duration::from_millis(50), shutdown.subscribe().recv());
        assert!(pending.await.is_err());
    }
}
