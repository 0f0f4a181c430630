use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::{CommandError, StorageError};
use crate::domain::entities::{Entry, ListName, StatusList};
use crate::domain::traits::Store;

/// In-memory copy of both lists, backed by a durable `Store`.
///
/// Each list sits behind its own lock so readers always see a whole list.
/// Callers that mutate are expected to serialize among themselves.
pub struct ListStore {
    store: Arc<dyn Store>,
    ally: RwLock<StatusList>,
    enemies: RwLock<StatusList>,
}

impl ListStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            ally: RwLock::new(StatusList::new(ListName::Ally)),
            enemies: RwLock::new(StatusList::new(ListName::Enemies)),
        }
    }

    fn slot(&self, name: ListName) -> &RwLock<StatusList> {
        match name {
            ListName::Ally => &self.ally,
            ListName::Enemies => &self.enemies,
        }
    }

    /// Replace the in-memory list with what storage holds
    pub async fn load(&self, name: ListName) -> Result<Vec<String>, StorageError> {
        let entries = self.store.load_list(name).await?;
        self.slot(name).write().await.replace(entries.clone());
        tracing::info!("Loaded {} {} entries", entries.len(), name.as_str());
        Ok(entries)
    }

    pub async fn load_all(&self) -> Result<(), StorageError> {
        for name in ListName::ALL {
            self.load(name).await?;
        }
        Ok(())
    }

    pub async fn append(&self, name: ListName, entry: Entry) {
        self.slot(name).write().await.append(entry);
    }

    /// Remove the first exact match. Leaves the list untouched on a miss.
    pub async fn remove(&self, name: ListName, entry: &str) -> Result<usize, CommandError> {
        self.slot(name)
            .write()
            .await
            .remove(entry)
            .ok_or_else(|| CommandError::NotFound {
                list: name,
                entry: entry.to_string(),
            })
    }

    /// Overwrite storage with the current in-memory list
    pub async fn persist(&self, name: ListName) -> Result<(), StorageError> {
        let snapshot = self.snapshot(name).await;
        self.store.save_list(name, snapshot.entries()).await?;
        tracing::debug!("Persisted {} {} entries", snapshot.len(), name.as_str());
        Ok(())
    }

    pub async fn snapshot(&self, name: ListName) -> StatusList {
        self.slot(name).read().await.clone()
    }

    pub async fn replace(&self, name: ListName, entries: Vec<String>) {
        self.slot(name).write().await.replace(entries);
    }
}
