use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::ProductId,
    error::StoreError,
    protocol::{StoreAction, StoreSnapshot},
};
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::{channel::StoreEvent, store::StateStore};

const COMMAND_QUEUE_CAPACITY: usize = 256;

pub type ActionResult = Result<Arc<StoreSnapshot>, StoreError>;

struct StoreCommand {
    action: StoreAction,
    reply: oneshot::Sender<ActionResult>,
}

/// Everything a consumer can do with the storefront: read the current
/// snapshot, subscribe to changes, and request mutations.
#[async_trait]
pub trait StorefrontHandle: Send + Sync {
    /// Applies `action` and returns the snapshot that reflects it.
    async fn dispatch(&self, action: StoreAction) -> ActionResult;
    fn snapshot(&self) -> Arc<StoreSnapshot>;
    fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent>;
    fn watch_snapshots(&self) -> watch::Receiver<Arc<StoreSnapshot>>;

    async fn select_detail(&self, id: ProductId) -> ActionResult {
        self.dispatch(StoreAction::SelectDetail { id }).await
    }

    async fn open_modal(&self, id: ProductId) -> ActionResult {
        self.dispatch(StoreAction::OpenModal { id }).await
    }

    async fn close_modal(&self) -> ActionResult {
        self.dispatch(StoreAction::CloseModal).await
    }

    async fn add_to_cart(&self, id: ProductId) -> ActionResult {
        self.dispatch(StoreAction::AddToCart { id }).await
    }

    async fn increment(&self, id: ProductId) -> ActionResult {
        self.dispatch(StoreAction::Increment { id }).await
    }

    async fn decrement(&self, id: ProductId) -> ActionResult {
        self.dispatch(StoreAction::Decrement { id }).await
    }

    async fn remove_item(&self, id: ProductId) -> ActionResult {
        self.dispatch(StoreAction::RemoveItem { id }).await
    }

    async fn clear_cart(&self) -> ActionResult {
        self.dispatch(StoreAction::ClearCart).await
    }
}

#[derive(Clone)]
pub struct StorefrontClient {
    commands: mpsc::Sender<StoreCommand>,
    snapshots: watch::Receiver<Arc<StoreSnapshot>>,
    events: broadcast::Sender<StoreEvent>,
}

/// Moves `store` onto a tokio task that applies actions one at a time in the
/// order they arrive. The task exits once every client has been dropped.
pub fn spawn_store(store: StateStore) -> (StorefrontClient, JoinHandle<()>) {
    let (commands, mut inbox) = mpsc::channel::<StoreCommand>(COMMAND_QUEUE_CAPACITY);
    let client = StorefrontClient {
        commands,
        snapshots: store.watch_snapshots(),
        events: store.channel().event_sender(),
    };

    let worker = tokio::spawn(async move {
        let mut store = store;
        while let Some(StoreCommand { action, reply }) = inbox.recv().await {
            let result = store.apply(action).map(|()| store.snapshot());
            if reply.send(result).is_err() {
                debug!(action = action.name(), "caller dropped before reply");
            }
        }
        info!(version = store.version(), "store worker stopped");
    });

    (client, worker)
}

#[async_trait]
impl StorefrontHandle for StorefrontClient {
    async fn dispatch(&self, action: StoreAction) -> ActionResult {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(StoreCommand { action, reply })
            .await
            .map_err(|_| StoreError::WorkerStopped)?;
        response.await.map_err(|_| StoreError::WorkerStopped)?
    }

    fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.snapshots.borrow().clone()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn watch_snapshots(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.snapshots.clone()
    }
}

#[cfg(test)]
#[path = "tests/worker_tests.rs"]
mod tests;
