//! Delivery of snapshots and recommendations to external consumers.
//!
//! Broadcast-based, at-least-once: every subscriber gets every delivery
//! that fits its buffer, and each delivery is tagged with the snapshot's
//! sequence number so consumers can detect and discard stale or duplicate
//! deliveries themselves. Published snapshots are immutable and shared by
//! `Arc`; nothing downstream can mutate pipeline state.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::trace;

use crate::engine::ScoredRecommendation;
use crate::error::StaleComputationError;
use crate::events::SeqNo;
use crate::state::GameStateSnapshot;

/// One published result: a snapshot and the ranked recommendations
/// computed against it.
#[derive(Clone, Debug)]
pub struct Delivery {
    pub seq: SeqNo,
    pub snapshot: Arc<GameStateSnapshot>,
    pub recommendations: Vec<ScoredRecommendation>,
}

impl Delivery {
    /// Consumers call this with the newest sequence number they have seen
    /// to reject stale deliveries.
    pub fn check_fresh(&self, newest: SeqNo) -> Result<(), StaleComputationError> {
        if newest > self.seq {
            Err(StaleComputationError {
                computed_against: self.seq,
                current: newest,
            })
        } else {
            Ok(())
        }
    }
}

/// Fan-out channel for deliveries.
pub struct AdviceBus {
    tx: broadcast::Sender<Arc<Delivery>>,
}

impl AdviceBus {
    /// Create a bus with the default per-subscriber buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish one delivery to all current subscribers.
    pub fn publish(&self, delivery: Arc<Delivery>) {
        if self.tx.send(delivery).is_err() {
            // No subscribers is a normal condition, not an error
            trace!("no subscribers for delivery");
        }
    }

    /// Subscribe; each subscriber sees deliveries from this point on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Delivery>> {
        self.tx.subscribe()
    }
}

impl Clone for AdviceBus {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl Default for AdviceBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    fn delivery(seq: u64) -> Arc<Delivery> {
        Arc::new(Delivery {
            seq: SeqNo::new(seq),
            snapshot: Arc::new(GameStateSnapshot::new(PlayerId::new(1), PlayerId::new(2))),
            recommendations: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = AdviceBus::new();
        let mut rx = bus.subscribe();

        bus.publish(delivery(1));
        bus.publish(delivery(2));

        assert_eq!(rx.recv().await.unwrap().seq, SeqNo::new(1));
        assert_eq!(rx.recv().await.unwrap().seq, SeqNo::new(2));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let bus = AdviceBus::new();
        bus.publish(delivery(1));
    }

    #[test]
    fn test_staleness_detection() {
        let d = delivery(5);
        assert!(d.check_fresh(SeqNo::new(5)).is_ok());
        assert!(d.check_fresh(SeqNo::new(4)).is_ok());
        assert!(d.check_fresh(SeqNo::new(6)).is_err());
    }
}
