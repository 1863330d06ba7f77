//! # Catalog
//!
//! Read-only view of the bookmarks owned by the bookmark service. The vote service
//! only asks whether a bookmark exists and what to show for it.
use std::{collections::BTreeMap, fs, path::Path};

use async_trait::async_trait;
use payloads::{Bookmark, ItemId};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::StorageError;

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn exists(&self, item_id: ItemId) -> Result<bool, StorageError>;

    async fn get(&self, item_id: ItemId) -> Result<Option<Bookmark>, StorageError>;

    /// Unordered; callers sort.
    async fn list(&self) -> Result<Vec<Bookmark>, StorageError>;
}

#[derive(Default)]
pub struct MemoryCatalog {
    bookmarks: RwLock<BTreeMap<ItemId, Bookmark>>,
}

impl MemoryCatalog {
    pub fn from_bookmarks(bookmarks: impl IntoIterator<Item = Bookmark>) -> Self {
        Self {
            bookmarks: RwLock::new(bookmarks.into_iter().map(|b| (b.id, b)).collect()),
        }
    }

    /// Loads a JSON array of bookmarks exported by the bookmark service.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let data = fs::read(path)?;
        let bookmarks: Vec<Bookmark> = serde_json::from_slice(&data)?;

        info!("Loaded {} bookmarks from {}", bookmarks.len(), path.display());

        Ok(Self::from_bookmarks(bookmarks))
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn exists(&self, item_id: ItemId) -> Result<bool, StorageError> {
        Ok(self.bookmarks.read().await.contains_key(&item_id))
    }

    async fn get(&self, item_id: ItemId) -> Result<Option<Bookmark>, StorageError> {
        Ok(self.bookmarks.read().await.get(&item_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Bookmark>, StorageError> {
        Ok(self.bookmarks.read().await.values().cloned().collect())
    }
}
