//! The in-memory set of items
//!
//! The [`Collection`] knows nothing about persistence. Display order is
//! derived on demand, never stored.

use std::{cmp::Reverse, collections::HashMap};

use serde::Serialize;

use crate::domain::{Item, ItemId};

/// All items, keyed by their identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    items: HashMap<ItemId, Item>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item under its own id, returning any item it replaced.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.id(), item)
    }

    /// Looks up an item.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    /// Removes an item, returning it if it was present.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
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

    /// Items in display order: newest first.
    ///
    /// Items created in the same millisecond are ordered by id so the
    /// result is stable between calls.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Item> {
        let mut items: Vec<_> = self.items.values().collect();
        items.sort_by_key(|item| (Reverse(item.created_at()), item.id()));
        items
    }

    /// Number of completed items.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items.values().filter(|item| item.is_completed()).count()
    }

    /// Resolves a full id or a unique prefix of one.
    ///
    /// # Errors
    ///
    /// Fails if nothing matches, if the prefix is blank, or if the prefix
    /// matches more than one item.
    pub fn resolve(&self, prefix: &str) -> Result<ItemId, ResolveError> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(ResolveError::NotFound(prefix));
        }
        if let Ok(id) = prefix.parse::<ItemId>() {
            if self.items.contains_key(&id) {
                return Ok(id);
            }
        }

        let mut matches: Vec<ItemId> = self
            .items
            .keys()
            .filter(|id| id.to_string().starts_with(&prefix))
            .copied()
            .collect();

        match matches.len() {
            0 => Err(ResolveError::NotFound(prefix)),
            1 => Ok(matches.remove(0)),
            count => Err(ResolveError::Ambiguous { prefix, count }),
        }
    }
}

impl FromIterator<Item> for Collection {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|item| (item.id(), item)).collect(),
        }
    }
}

/// Failure to turn user input into an item id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No item id starts with the given text.
    #[error("no item matching '{0}'")]
    NotFound(String),
    /// Several item ids start with the given text.
    #[error("'{prefix}' is ambiguous: it matches {count} items")]
    Ambiguous {
        /// The prefix that was searched for.
        prefix: String,
        /// How many items matched.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn item_at(id: &str, millis: i64) -> Item {
        Item::new_with_id(
            id.parse().unwrap(),
            format!("created at {millis}"),
            Utc.timestamp_millis_opt(millis).unwrap(),
        )
    }

    #[test]
    fn sorted_is_newest_first() {
        let collection: Collection = [
            item_at("00000000-0000-4000-8000-000000000001", 100),
            item_at("00000000-0000-4000-8000-000000000002", 300),
            item_at("00000000-0000-4000-8000-000000000003", 200),
        ]
        .into_iter()
        .collect();

        let order: Vec<i64> = collection
            .sorted()
            .iter()
            .map(|item| item.created_at().timestamp_millis())
            .collect();
        assert_eq!(order, [300, 200, 100]);
    }

    #[test]
    fn ties_are_broken_by_id() {
        let a = item_at("00000000-0000-4000-8000-00000000000a", 100);
        let b = item_at("00000000-0000-4000-8000-00000000000b", 100);
        let collection: Collection = [b.clone(), a.clone()].into_iter().collect();

        let ids: Vec<ItemId> = collection.sorted().iter().map(|i| i.id()).collect();
        assert_eq!(ids, [a.id(), b.id()]);
    }

    #[test]
    fn resolve_accepts_full_id_and_unique_prefix() {
        let collection: Collection = [
            item_at("aaaa0000-0000-4000-8000-000000000001", 1),
            item_at("bbbb0000-0000-4000-8000-000000000002", 2),
        ]
        .into_iter()
        .collect();

        let full = "aaaa0000-0000-4000-8000-000000000001";
        assert_eq!(collection.resolve(full).unwrap().to_string(), full);
        assert_eq!(
            collection.resolve("BBB").unwrap().to_string(),
            "bbbb0000-0000-4000-8000-000000000002"
        );
    }

    #[test]
    fn resolve_reports_missing_and_ambiguous() {
        let collection: Collection = [
            item_at("abcd0000-0000-4000-8000-000000000001", 1),
            item_at("abce0000-0000-4000-8000-000000000002", 2),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            collection.resolve("ff"),
            Err(ResolveError::NotFound("ff".to_string()))
        );
        assert_eq!(
            collection.resolve("abc"),
            Err(ResolveError::Ambiguous {
                prefix: "abc".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn resolve_rejects_blank_prefix() {
        let collection: Collection = [item_at("abcd0000-0000-4000-8000-000000000001", 1)]
            .into_iter()
            .collect();

        assert_eq!(
            collection.resolve(""),
            Err(ResolveError::NotFound(String::new()))
        );
        assert_eq!(
            collection.resolve("   "),
            Err(ResolveError::NotFound(String::new()))
        );
    }
}
