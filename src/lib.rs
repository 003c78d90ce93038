//! Local To-Do List
//!
//! Items live in memory and are saved as a single JSON snapshot after every
//! change.

pub mod domain;
pub use domain::{Collection, Config, Item, ItemId};

/// Persistence of the item collection.
pub mod storage;
pub use storage::{Backend, FileBackend, ItemStore, MemoryBackend, NotFound};

/// User-facing state layered over the item store.
pub mod view;
pub use view::{Phase, Row, View};
