//! Shutdown signalling for a running swarm

use tokio::sync::watch;
use tracing::info;

/// Triggers a stop of every user of a swarm.
///
/// Cloning is cheap; any clone can trigger. Triggering more than once is a no-op.
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

/// Waits for a [`Shutdown`] to be triggered
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn trigger(&self, reason: &str) {
        let first = self.sender.send_if_modified(|stopped| {
            let changed = !*stopped;
            *stopped = true;
            changed
        });
        if first {
            info!("Stopping swarm: {}", reason);
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once shutdown has been triggered, immediately if it already was
    pub async fn wait(&mut self) {
        // The sender lives in the swarm for the whole run; a closed channel
        // means it is gone, which is as good as a shutdown.
        let _ = self.receiver.wait_for(|stopped| *stopped).await;
    }
}
