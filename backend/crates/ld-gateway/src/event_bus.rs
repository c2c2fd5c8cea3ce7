use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Fan-out channel for gateway notifications.
///
/// Keeps a count of live [`Subscription`]s so callers can verify that
/// registrations are released.
pub struct EventBus<T> {
    sender: broadcast::Sender<T>,
    active: Arc<AtomicUsize>,
}

impl<T: Clone + Send + 'static> EventBus<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Deliver an event to every live subscription. Returns the receiver count.
    pub fn publish(&self, event: T) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                // No subscriptions yet, nothing to deliver
                debug!("Event published with no active subscriptions");
                0
            }
        }
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let count = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Subscription registered ({} active)", count);

        Subscription {
            receiver: self.sender.subscribe(),
            active: Arc::clone(&self.active),
            released: false,
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            active: Arc::clone(&self.active),
        }
    }
}

/// Scoped registration on an [`EventBus`]. Released on drop.
pub struct Subscription<T> {
    receiver: broadcast::Receiver<T>,
    active: Arc<AtomicUsize>,
    released: bool,
}

impl<T: Clone> Subscription<T> {
    /// Next event, or None once the bus is gone. Lagged events are skipped.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Subscription lagged, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-queued event, if any
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Subscription lagged, {} events skipped", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

impl<T> Subscription<T> {
    pub fn unsubscribe(self) {
        drop(self);
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let remaining = self.active.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        debug!("Subscription released ({} active)", remaining);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.release();
    }
}
