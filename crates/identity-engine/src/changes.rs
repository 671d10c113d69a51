//! Session-change notifications.
//!
//! Subscribers receive the most recent session state first (once one has
//! been published), then every later change in order.

use crate::ProviderUser;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::warn;

const CHANNEL_CAPACITY: usize = 32;

/// Fan-out point for session changes, owned by an identity provider.
pub struct SessionChangeHub {
    tx: broadcast::Sender<Option<ProviderUser>>,
    /// `None` until the first publish.
    last: Mutex<Option<Option<ProviderUser>>>,
}

impl SessionChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            last: Mutex::new(None),
        }
    }

    /// Publish a session change to every subscriber.
    pub fn publish(&self, user: Option<ProviderUser>) {
        // Hold the lock across the send so a concurrent subscribe sees either
        // the old state plus this event, or the new state alone.
        let mut last = self.last.lock();
        *last = Some(user.clone());
        // No receivers is fine.
        let _ = self.tx.send(user);
    }

    pub fn subscribe(&self) -> SessionChanges {
        let last = self.last.lock();
        SessionChanges {
            initial: last.clone(),
            rx: self.tx.subscribe(),
        }
    }

    /// True once any session state has been published.
    pub fn has_published(&self) -> bool {
        self.last.lock().is_some()
    }
}

impl Default for SessionChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscription to session changes.
pub struct SessionChanges {
    initial: Option<Option<ProviderUser>>,
    rx: broadcast::Receiver<Option<ProviderUser>>,
}

impl SessionChanges {
    /// Wait for the next session state. `None` means the provider is gone.
    pub async fn next(&mut self) -> Option<Option<ProviderUser>> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.rx.recv().await {
                Ok(user) => return Some(user),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Session change subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
