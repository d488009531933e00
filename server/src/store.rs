//! In-memory list item store.
//!
//! # Design
//! Ids are allocated by a monotonic counter and never reused, so a
//! `BTreeMap` keyed by id iterates in insertion order without a separate
//! ordering index. One store lives for the lifetime of the process; it is
//! built once at startup and shared with the router behind an `Arc`.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::model::{ItemId, ListItem};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("item id space exhausted after {0}")]
    IdsExhausted(ItemId),
}

#[derive(Debug)]
struct Inner {
    items: BTreeMap<ItemId, ListItem>,
    last_id: ItemId,
}

/// Authoritative collection of list items for this process.
#[derive(Debug)]
pub struct ListItemStore {
    inner: RwLock<Inner>,
}

impl Default for ListItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ListItemStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    pub async fn list(&self) -> Vec<ListItem> {
        self.inner.read().await.items.values().cloned().collect()
    }

    pub async fn get(&self, id: ItemId) -> Result<ListItem, StoreError> {
        self.inner
            .read()
            .await
            .items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Append a new item under a freshly allocated id.
    pub async fn insert(&self, title: String, is_completed: bool) -> Result<ListItem, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner
            .last_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted(inner.last_id))?;
        let item = ListItem {
            id,
            title,
            is_completed,
        };
        inner.last_id = id;
        inner.items.insert(id, item.clone());
        Ok(item)
    }

    /// Replace the mutable fields of an existing item. The id never changes.
    pub async fn update(
        &self,
        id: ItemId,
        title: String,
        is_completed: bool,
    ) -> Result<ListItem, StoreError> {
        let mut inner = self.inner.write().await;
        let item = inner.items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        item.title = title;
        item.is_completed = is_completed;
        Ok(item.clone())
    }

    pub async fn remove(&self, id: ItemId) -> Result<ListItem, StoreError> {
        self.inner
            .write()
            .await
            .items
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }

    #[cfg(test)]
    async fn set_last_id(&self, id: ItemId) {
        self.inner.write().await.last_id = id;
    }
}
