use std::sync::Arc;

use shared::{
    error::{ErrorReport, StoreError},
    protocol::{StoreAction, StoreSnapshot},
};
use tokio::sync::{broadcast, watch};
use tracing::trace;

pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub enum StoreEvent {
    SnapshotPublished(Arc<StoreSnapshot>),
    ActionRejected {
        action: StoreAction,
        error: ErrorReport,
    },
}

/// Fan-out point between the store and its consumers.
///
/// The watch side always holds the latest snapshot so late subscribers can
/// render immediately; the broadcast side delivers one event per committed
/// change.
pub struct SnapshotChannel {
    current: watch::Sender<Arc<StoreSnapshot>>,
    events: broadcast::Sender<StoreEvent>,
}

impl SnapshotChannel {
    pub fn new(initial: StoreSnapshot, capacity: usize) -> Self {
        let (current, _) = watch::channel(Arc::new(initial));
        let (events, _) = broadcast::channel(capacity.max(1));
        Self { current, events }
    }

    pub fn publish(&self, snapshot: StoreSnapshot) -> Arc<StoreSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.send_replace(Arc::clone(&snapshot));
        // no receivers is fine
        let delivered = self
            .events
            .send(StoreEvent::SnapshotPublished(Arc::clone(&snapshot)))
            .unwrap_or(0);
        trace!(version = snapshot.version, delivered, "snapshot published");
        snapshot
    }

    pub fn reject(&self, action: StoreAction, error: &StoreError) {
        let _ = self.events.send(StoreEvent::ActionRejected {
            action,
            error: error.into(),
        });
    }

    pub fn current(&self) -> Arc<StoreSnapshot> {
        self.current.borrow().clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn watch(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.current.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<StoreEvent> {
        self.events.clone()
    }
}
