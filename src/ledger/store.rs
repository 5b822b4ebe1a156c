//! Key-value store substrate backing the ledgers

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::storage::validate_key;

/// Durable keyed byte storage. Ledgers own one store instance each.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove an entry, reporting whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// All stored values, in no particular order
    async fn list(&self) -> Result<Vec<Vec<u8>>>;
}

/// Filesystem store: one JSON file per key under `{base}/{ledger_id}/`
pub struct FsKvStore {
    root: PathBuf,
}

impl FsKvStore {
    pub fn new<P: AsRef<Path>>(base: P, ledger_id: &str) -> Self {
        Self {
            root: base.as_ref().join(ledger_id),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !validate_key(key) {
            return Err(AppError::Validation(format!("Invalid store key: {}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }

    async fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await?;
            debug!(path = ?self.root, "Created ledger directory");
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FsKvStore {
    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.ensure_root().await?;
        let path = self.path_for(key)?;
        fs::write(&path, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<Vec<u8>>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut values = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
                values.push(fs::read(entry.path()).await?);
            }
        }

        Ok(values)
    }
}

/// In-memory store, shared behind an Arc so tests can keep a handle
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    async fn list(&self) -> Result<Vec<Vec<u8>>> {
        Ok(self.entries.read().values().cloned().collect())
    }
}
