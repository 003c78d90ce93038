//! Domain models for the to-do list.
//!
//! This module contains the item type, the collection of items and the
//! configuration.

/// A single to-do entry and its identifier.
pub mod item;
pub use item::{Item, ItemId};

/// The in-memory item collection and its display order.
pub mod collection;
pub use collection::{Collection, ResolveError};

mod config;
pub use config::{Config, ConfigError};
