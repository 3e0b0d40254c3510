//! Change notification for the registries
//!
//! Registries publish a [`ChangeEvent`] after every mutation. Subscribers
//! re-read whatever aggregates they display; events carry ids only, never
//! cached values.

use tokio::sync::broadcast;

/// Something in a registry changed
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A hive was inserted or replaced
    HiveUpserted { id: String },
    /// A hive was deregistered
    HiveRemoved { id: String },
    /// A refresh was applied
    HivesRefreshed { count: usize },
    /// A refresh failed; the registry is now offline
    RefreshFailed { code: &'static str, message: String },
    /// A batch of recommendations was inserted
    RecommendationsAdded { count: usize },
    /// A recommendation moved to completed
    RecommendationCompleted { id: String },
}

/// Publish side of the change channel. Cheap to clone; every clone feeds the
/// same subscribers.
#[derive(Clone, Debug)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: ChangeEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event);
    }

    /// Create a new subscriber
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}
