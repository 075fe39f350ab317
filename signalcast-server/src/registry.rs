//! Subscriber registry — bounded outboxes, fire-and-forget fan-out.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Identifies one subscriber connection for its lifetime.
pub type SubscriberId = u64;

/// Capacity of each subscriber's outbox. A subscriber that falls this many
/// messages behind is evicted rather than allowed to stall delivery.
pub const OUTBOX_CAPACITY: usize = 32;

/// The set of live subscriber outboxes.
///
/// Delivery to one subscriber never blocks on another: each push is a
/// single `try_send` into that subscriber's own bounded channel, and a full
/// or closed channel evicts the subscriber on the spot. There is no retry;
/// a reconnecting client recovers with a history query.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: HashMap<SubscriberId, mpsc::Sender<String>>,
    next_id: SubscriberId,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, outbox: mpsc::Sender<String>) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.insert(id, outbox);
        debug!(subscriber = id, total = self.subscribers.len(), "subscriber registered");
        id
    }

    pub fn unregister(&mut self, id: SubscriberId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!(subscriber = id, total = self.subscribers.len(), "subscriber unregistered");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Push one serialized message to every subscriber; returns how many
    /// accepted it. Full or closed outboxes are evicted.
    pub fn broadcast(&mut self, text: &str) -> usize {
        let mut evicted = Vec::new();
        let mut delivered = 0;
        for (&id, outbox) in &self.subscribers {
            match outbox.try_send(text.to_string()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(subscriber = id, "outbox full, evicting stalled subscriber");
                    evicted.push(id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(subscriber = id, "outbox closed, evicting subscriber");
                    evicted.push(id);
                }
            }
        }
        for id in evicted {
            self.subscribers.remove(&id);
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_unique_ids() {
        let mut registry = SubscriberRegistry::new();
        let (tx, _rx1) = mpsc::channel(1);
        let a = registry.register(tx);
        let (tx, _rx2) = mpsc::channel(1);
        let b = registry.register(tx);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert!(registry.unregister(a));
        assert!(!registry.unregister(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn broadcast_delivers_to_all_live_subscribers() {
        let mut registry = SubscriberRegistry::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        registry.register(tx_a);
        registry.register(tx_b);

        assert_eq!(registry.broadcast("hello"), 2);
        assert_eq!(rx_a.try_recv().unwrap(), "hello");
        assert_eq!(rx_b.try_recv().unwrap(), "hello");
    }

    #[test]
    fn full_outbox_is_evicted_without_blocking_others() {
        let mut registry = SubscriberRegistry::new();
        let (tx_stalled, mut rx_stalled) = mpsc::channel(1);
        let (tx_healthy, mut rx_healthy) = mpsc::channel(4);
        registry.register(tx_stalled);
        registry.register(tx_healthy);

        assert_eq!(registry.broadcast("one"), 2);
        // The stalled subscriber never drains; the second push evicts it.
        assert_eq!(registry.broadcast("two"), 1);
        assert_eq!(registry.len(), 1);

        assert_eq!(rx_stalled.try_recv().unwrap(), "one");
        // Registry dropped its sender, so the channel ends after the backlog.
        assert!(rx_stalled.try_recv().is_err());
        assert_eq!(rx_healthy.try_recv().unwrap(), "one");
        assert_eq!(rx_healthy.try_recv().unwrap(), "two");
    }

    #[test]
    fn closed_outbox_is_evicted() {
        let mut registry = SubscriberRegistry::new();
        let (tx, rx) = mpsc::channel(1);
        registry.register(tx);
        drop(rx);
        assert_eq!(registry.broadcast("gone"), 0);
        assert!(registry.is_empty());
    }
}
