//! Gallery ledger - single logical owner of gallery metadata for one identity

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::ledger::store::KeyValueStore;

const COMMAND_BUFFER: usize = 64;

/// Persisted gallery record. Immutable once created, until deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub prompt: String,
    pub url: String,
    /// Epoch milliseconds, used only for sort order
    pub created_at: i64,
}

enum GalleryCommand {
    Add {
        item: GalleryItem,
        reply: oneshot::Sender<Result<()>>,
    },
    List {
        reply: oneshot::Sender<Result<Vec<GalleryItem>>>,
    },
    Delete {
        id: String,
        reply: oneshot::Sender<Result<bool>>,
    },
}

/// Handle to a gallery ledger actor. Cloning shares the same actor.
#[derive(Clone)]
pub struct GalleryLedger {
    id: String,
    tx: mpsc::Sender<GalleryCommand>,
}

impl GalleryLedger {
    /// Spawn the writer task for the ledger identified by `id`, taking
    /// exclusive ownership of `store`.
    pub fn spawn(id: impl Into<String>, store: Box<dyn KeyValueStore>) -> Self {
        let id = id.into();
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);

        tokio::spawn(run(id.clone(), store, rx));

        Self { id, tx }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Insert an item keyed by its id. A colliding id overwrites silently;
    /// ids are caller-generated and expected globally unique.
    pub async fn add_image(&self, item: GalleryItem) -> Result<()> {
        self.send(|reply| GalleryCommand::Add { item, reply }).await
    }

    /// All items, newest first
    pub async fn list_images(&self) -> Result<Vec<GalleryItem>> {
        self.send(|reply| GalleryCommand::List { reply }).await
    }

    /// Remove an entry if present; returns whether a record existed
    pub async fn delete_image(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.send(|reply| GalleryCommand::Delete { id, reply }).await
    }

    async fn send<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T>>) -> GalleryCommand) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| AppError::Ledger("Gallery ledger is unavailable".to_string()))?;
        reply_rx
            .await
            .map_err(|_| AppError::Ledger("Gallery ledger dropped the request".to_string()))?
    }
}

async fn run(
    ledger_id: String,
    store: Box<dyn KeyValueStore>,
    mut rx: mpsc::Receiver<GalleryCommand>,
) {
    debug!(ledger = %ledger_id, "Gallery ledger started");

    while let Some(command) = rx.recv().await {
        match command {
            GalleryCommand::Add { item, reply } => {
                let result = add_image(store.as_ref(), &item).await;
                let _ = reply.send(result);
            }
            GalleryCommand::List { reply } => {
                let result = list_images(&ledger_id, store.as_ref()).await;
                let _ = reply.send(result);
            }
            GalleryCommand::Delete { id, reply } => {
                let result = store.delete(&id).await;
                let _ = reply.send(result);
            }
        }
    }

    debug!(ledger = %ledger_id, "Gallery ledger stopped");
}

async fn add_image(store: &dyn KeyValueStore, item: &GalleryItem) -> Result<()> {
    let encoded = serde_json::to_vec(item)?;
    store.put(&item.id, &encoded).await
}

async fn list_images(ledger_id: &str, store: &dyn KeyValueStore) -> Result<Vec<GalleryItem>> {
    let mut items = Vec::new();

    for value in store.list().await? {
        match serde_json::from_slice::<GalleryItem>(&value) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(ledger = %ledger_id, error = %e, "Skipping unreadable gallery record");
            }
        }
    }

    // Newest first; the store's native order is irrelevant
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
}
