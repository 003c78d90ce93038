//! State of the list screen
//!
//! A [`View`] owns the [`ItemStore`] and the transient input state around it:
//! the text typed into the new-item field and the per-item edit buffers.
//! Drafts stay here until they are committed; only then do they reach the
//! store.

use std::collections::HashMap;

use crate::{
    domain::{Item, ItemId},
    storage::{Backend, ItemStore, NotFound},
};

/// Whether the saved items have been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The snapshot has not been loaded; show a placeholder.
    Loading,
    /// The items are available.
    Ready,
}

/// One line of the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    /// The item shown on this line.
    pub item: &'a Item,
    /// The edit buffer, if the item is being edited.
    pub editing: Option<&'a str>,
}

/// The list screen.
#[derive(Debug)]
pub struct View<B> {
    store: ItemStore<B>,
    phase: Phase,
    draft: String,
    editing: HashMap<ItemId, String>,
}

impl<B: Backend> View<B> {
    /// Wraps a store that has not been loaded yet.
    #[must_use]
    pub fn new(store: ItemStore<B>) -> Self {
        Self {
            store,
            phase: Phase::Loading,
            draft: String::new(),
            editing: HashMap::new(),
        }
    }

    /// Loads the saved items and leaves the loading phase.
    pub fn load(&mut self) {
        self.store.load();
        self.editing.clear();
        self.phase = Phase::Ready;
    }

    /// Replaces the new-item draft.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Adds the draft as a new item.
    ///
    /// The draft is cleared only if an item was created; an empty draft is
    /// left as is.
    pub fn submit_draft(&mut self) -> Option<ItemId> {
        let id = self.store.add(std::mem::take(&mut self.draft));
        if id.is_none() {
            tracing::debug!("Ignoring empty draft");
        }
        id
    }

    /// Puts an item into editing mode, seeding the buffer with its text.
    ///
    /// An item that is already being edited keeps its buffer.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id.
    pub fn start_editing(&mut self, id: ItemId) -> Result<(), NotFound> {
        let text = self.store.get(id).ok_or(NotFound(id))?.text();
        self.editing
            .entry(id)
            .or_insert_with(|| text.to_string());
        Ok(())
    }

    /// Replaces the edit buffer of an item.
    ///
    /// Returns `false` if the item is not being edited.
    pub fn edit_draft(&mut self, id: ItemId, text: impl Into<String>) -> bool {
        let Some(buffer) = self.editing.get_mut(&id) else {
            return false;
        };
        *buffer = text.into();
        true
    }

    /// Commits the edit buffer of an item and leaves editing mode.
    ///
    /// Does nothing if the item is not being edited. The buffer is
    /// committed as typed, including an empty one.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the item disappeared while being edited.
    pub fn finish_editing(&mut self, id: ItemId) -> Result<(), NotFound> {
        self.editing
            .remove(&id)
            .map_or(Ok(()), |text| self.store.update(id, text))
    }

    /// Leaves editing mode without saving.
    pub fn cancel_editing(&mut self, id: ItemId) {
        self.editing.remove(&id);
    }

    /// Marks an item as completed.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id.
    pub fn complete(&mut self, id: ItemId) -> Result<(), NotFound> {
        self.store.complete(id)
    }

    /// Marks an item as not completed.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id.
    pub fn uncomplete(&mut self, id: ItemId) -> Result<(), NotFound> {
        self.store.uncomplete(id)
    }

    /// Completes an open item or reopens a completed one.
    ///
    /// Returns the new completion state.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id.
    pub fn toggle(&mut self, id: ItemId) -> Result<bool, NotFound> {
        let completed = self.store.get(id).ok_or(NotFound(id))?.is_completed();
        if completed {
            self.uncomplete(id)?;
        } else {
            self.complete(id)?;
        }
        Ok(!completed)
    }

    /// Deletes an item, discarding any edit in progress.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no item has this id.
    pub fn delete(&mut self, id: ItemId) -> Result<Item, NotFound> {
        self.editing.remove(&id);
        self.store.delete(id)
    }
}

impl<B> View<B> {
    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The new-item draft.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether an item is in editing mode.
    #[must_use]
    pub fn is_editing(&self, id: ItemId) -> bool {
        self.editing.contains_key(&id)
    }

    /// The rows to render, newest item first.
    ///
    /// Empty while loading.
    #[must_use]
    pub fn rows(&self) -> Vec<Row<'_>> {
        if self.phase == Phase::Loading {
            return Vec::new();
        }
        self.store
            .sorted()
            .into_iter()
            .map(|item| Row {
                item,
                editing: self.editing.get(&item.id()).map(String::as_str),
            })
            .collect()
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &ItemStore<B> {
        &self.store
    }
}
