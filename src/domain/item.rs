use std::{fmt, str::FromStr};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable identifier of an [`Item`].
///
/// Serialized as the hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Identifier, fixed at creation.
    pub(crate) id: ItemId,
    /// The user-supplied text.
    pub(crate) text: String,
    /// Whether the item has been ticked off.
    pub(crate) is_completed: bool,
    /// Creation time, stored as epoch milliseconds.
    ///
    /// Older snapshots spell the field `createAt`.
    #[serde(with = "chrono::serde::ts_milliseconds", alias = "createAt")]
    pub(crate) created_at: DateTime<Utc>,
}

impl Item {
    /// Creates an uncompleted item stamped with the current time.
    #[must_use]
    pub(crate) fn new(text: String) -> Self {
        Self::new_with_id(ItemId::new(), text, Utc::now())
    }

    /// The timestamp is truncated to millisecond precision so that the
    /// item compares equal after a trip through the snapshot format.
    pub(crate) fn new_with_id(id: ItemId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            is_completed: false,
            created_at: created_at.trunc_subsecs(3),
        }
    }

    /// The item's identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// The item's text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the item is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// When the item was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
