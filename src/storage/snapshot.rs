//! JSON encoding of the whole collection
//!
//! The snapshot is a JSON object keyed by item id:
//!
//! ```json
//! { "<id>": { "id": "<id>", "text": "...", "isCompleted": false, "createdAt": 1540000000000 } }
//! ```

use std::collections::HashMap;

use crate::domain::{Collection, Item, ItemId};

/// Errors decoding or encoding a snapshot.
#[derive(Debug, thiserror::Error)]
#[error("malformed snapshot")]
pub struct SnapshotError(#[from] serde_json::Error);

/// Serializes the collection.
///
/// # Errors
///
/// Returns an error if serialization fails, which does not happen for
/// well-formed items.
pub fn encode(collection: &Collection) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(collection)?)
}

/// Parses a snapshot.
///
/// Entries whose key does not parse as the id inside the value are
/// dropped. Keys are compared as ids, so letter case does not matter.
///
/// # Errors
///
/// Returns an error if the text is not a JSON object of items.
pub fn decode(text: &str) -> Result<Collection, SnapshotError> {
    let entries: HashMap<String, Item> = serde_json::from_str(text)?;

    Ok(entries
        .into_iter()
        .filter(|(key, item)| {
            let consistent = key.parse::<ItemId>().ok() == Some(item.id());
            if !consistent {
                tracing::warn!("Dropping snapshot entry '{key}': it holds item {}", item.id());
            }
            consistent
        })
        .map(|(_, item)| item)
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn decode_reads_wire_format() {
        let text = r#"{
            "6f1c1b9e-3d2a-4c55-9a7e-0b8f2f1e4d10": {
                "id": "6f1c1b9e-3d2a-4c55-9a7e-0b8f2f1e4d10",
                "text": "buy milk",
                "isCompleted": true,
                "createdAt": 1540000000000
            }
        }"#;

        let collection = decode(text).unwrap();
        let id: ItemId = "6f1c1b9e-3d2a-4c55-9a7e-0b8f2f1e4d10".parse().unwrap();
        let item = collection.get(id).unwrap();

        assert_eq!(item.text(), "buy milk");
        assert!(item.is_completed());
        assert_eq!(item.created_at().timestamp_millis(), 1_540_000_000_000);
    }

    #[test]
    fn decode_drops_entries_under_the_wrong_key() {
        let text = r#"{
            "00000000-0000-4000-8000-000000000001": {
                "id": "00000000-0000-4000-8000-000000000002",
                "text": "misfiled",
                "isCompleted": false,
                "createdAt": 1
            }
        }"#;

        assert!(decode(text).unwrap().is_empty());
    }

    #[test]
    fn decode_keeps_entries_under_an_uppercase_key() {
        let text = r#"{
            "6F1C1B9E-3D2A-4C55-9A7E-0B8F2F1E4D10": {
                "id": "6f1c1b9e-3d2a-4c55-9a7e-0b8f2f1e4d10",
                "text": "shouting",
                "isCompleted": false,
                "createdAt": 1
            }
        }"#;

        let collection = decode(text).unwrap();
        let id: ItemId = "6f1c1b9e-3d2a-4c55-9a7e-0b8f2f1e4d10".parse().unwrap();
        assert_eq!(collection.get(id).unwrap().text(), "shouting");
    }

    #[test]
    fn decode_rejects_malformed_text() {
        assert!(decode("").is_err());
        assert!(decode("[]").is_err());
        assert!(decode(r#"{"x": {"text": "no id"}}"#).is_err());
    }

    #[test]
    fn encoded_collection_decodes_to_the_same_items() {
        let mut done = Item::new_with_id(
            ItemId::new(),
            "done".to_string(),
            Utc.timestamp_millis_opt(200).unwrap(),
        );
        done.is_completed = true;
        let collection: Collection = [Item::new("open".to_string()), done]
            .into_iter()
            .collect();

        let decoded = decode(&encode(&collection).unwrap()).unwrap();
        assert_eq!(decoded, collection);
    }
}
