// Live subscriber registry and best-effort fan-out

use crate::error::DeliveryError;
use dashmap::DashMap;
use oracle_models::LiveMessage;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info};
use uuid::Uuid;

pub type SubscriberId = Uuid;

/// Default number of undelivered messages a subscriber may queue.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

/// Sending half of one live connection.
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    id: SubscriberId,
    tx: mpsc::Sender<Arc<str>>,
}

impl SubscriberHandle {
    /// Create a handle plus the queue its connection task must drain.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { id: Uuid::new_v4(), tx }, rx)
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn deliver(&self, payload: Arc<str>) -> Result<(), DeliveryError> {
        self.tx.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Lagging,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: DashMap<SubscriberId, SubscriberHandle>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handle: SubscriberHandle) -> SubscriberId {
        let id = handle.id();
        self.subscribers.insert(id, handle);
        info!("🔌 Subscriber {} connected ({} live)", id, self.subscribers.len());
        id
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unregister(&self, id: &SubscriberId) -> bool {
        let removed = self.subscribers.remove(id).is_some();
        if removed {
            info!("👋 Subscriber {} disconnected ({} live)", id, self.subscribers.len());
        }
        removed
    }

    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.subscribers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Clone the current handles; no shard lock outlives this call.
    pub fn snapshot(&self) -> Vec<SubscriberHandle> {
        self.subscribers.iter().map(|entry| entry.value().clone()).collect()
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub delivered: usize,
    pub pruned: usize,
}

#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<SubscriberRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    /// Serialize once and offer the message to every live subscriber.
    pub fn broadcast(&self, message: &LiveMessage) -> BroadcastReport {
        match serde_json::to_string(message) {
            Ok(json) => self.broadcast_raw(Arc::from(json)),
            Err(e) => {
                error!("❌ Failed to encode live message: {}", e);
                BroadcastReport::default()
            }
        }
    }

    pub fn broadcast_raw(&self, payload: Arc<str>) -> BroadcastReport {
        let targets = self.registry.snapshot();
        let mut report = BroadcastReport {
            attempted: targets.len(),
            ..BroadcastReport::default()
        };

        for subscriber in targets {
            match subscriber.deliver(payload.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    debug!("Dropping subscriber {}: {}", subscriber.id(), e);
                    if self.registry.unregister(&subscriber.id()) {
                        report.pruned += 1;
                    }
                }
            }
        }

        report
    }
}
