//! A persisted store of to-do items
//!
//! The [`ItemStore`] owns the in-memory [`Collection`] and mirrors it to a
//! [`Backend`] after every successful mutation. Backend failures are logged
//! and never reach the caller.

use non_empty_string::NonEmptyString;
use tracing::instrument;

use crate::{
    domain::{Collection, Item, ItemId},
    storage::{snapshot, Backend},
};

/// The item collection together with the backend it is saved to.
#[derive(Debug)]
pub struct ItemStore<B> {
    backend: B,
    key: String,
    items: Collection,
}

/// The item does not exist.
///
/// The store is left unchanged and nothing is written to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("item {0} not found")]
pub struct NotFound(pub ItemId);

impl<B: Backend> ItemStore<B> {
    /// Creates an empty store that saves under `key`.
    ///
    /// Call [`ItemStore::load`] to pick up a previously saved snapshot.
    #[must_use]
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            items: Collection::new(),
        }
    }

    /// Replaces the in-memory items with the saved snapshot.
    ///
    /// An absent, unreadable or malformed snapshot yields an empty
    /// collection.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&mut self) {
        self.items = match self.backend.get(&self.key) {
            Ok(Some(text)) => snapshot::decode(&text).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable snapshot: {e}");
                Collection::new()
            }),
            Ok(None) => {
                tracing::debug!("No snapshot saved yet");
                Collection::new()
            }
            Err(e) => {
                tracing::warn!("Failed to read snapshot: {e}");
                Collection::new()
            }
        };
        tracing::debug!("Loaded {} items", self.items.len());
    }

    /// Writes the full collection to the backend.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save(&self) {
        let text = match snapshot::encode(&self.items) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to encode snapshot: {e}");
                return;
            }
        };

        if let Err(e) = self.backend.set(&self.key, &text) {
            tracing::warn!("Failed to save snapshot: {e}");
            return;
        }
        tracing::debug!("Saved {} items under '{}'", self.items.len(), self.key);
    }

    /// Adds a new, uncompleted item.
    ///
    /// Returns `None` without touching the store if `text` is the empty
    /// string. Whitespace-only text is accepted.
    pub fn add(&mut self, text: String) -> Option<ItemId> {
        let text = NonEmptyString::new(text).ok()?;
        let item = Item::new(text.to_string());
        let id = item.id();

        self.items.insert(item);
        tracing::info!("Added item {id}");
        self.save();

        Some(id)
    }

    /// Replaces the text of an item. Nothing else about the item changes.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id.
    pub fn update(&mut self, id: ItemId, text: String) -> Result<(), NotFound> {
        self.modify(id, |item| item.text = text)?;
        tracing::info!("Updated item {id}");
        Ok(())
    }

    /// Marks an item as completed.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id.
    pub fn complete(&mut self, id: ItemId) -> Result<(), NotFound> {
        self.set_completed(id, true)
    }

    /// Marks an item as not completed.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id.
    pub fn uncomplete(&mut self, id: ItemId) -> Result<(), NotFound> {
        self.set_completed(id, false)
    }

    /// Removes an item and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id, which includes an item
    /// that was already deleted.
    pub fn delete(&mut self, id: ItemId) -> Result<Item, NotFound> {
        let item = self.items.remove(id).ok_or(NotFound(id))?;
        tracing::info!("Deleted item {id}");
        self.save();
        Ok(item)
    }

    fn set_completed(&mut self, id: ItemId, completed: bool) -> Result<(), NotFound> {
        self.modify(id, |item| item.is_completed = completed)?;
        tracing::info!(completed, "Set completion of item {id}");
        Ok(())
    }

    fn modify(&mut self, id: ItemId, f: impl FnOnce(&mut Item)) -> Result<(), NotFound> {
        let item = self.items.get_mut(id).ok_or(NotFound(id))?;
        f(item);
        self.save();
        Ok(())
    }
}

impl<B> ItemStore<B> {
    /// Looks up an item.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// The current items.
    #[must_use]
    pub const fn items(&self) -> &Collection {
        &self.items
    }

    /// Items in display order: newest first.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Item> {
        self.items.sorted()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
