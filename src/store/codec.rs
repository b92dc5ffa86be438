//! JSON codec for the entry store blob.
//!
//! Layout (implicit schema version 1):
//!
//! ```json
//! { "2024-03-01": { "lines": ["Family", "Health", "Coffee"] } }
//! ```

use crate::entry::{DateKey, Entry};
use crate::errors::{StorageError, StorageResult};
use std::collections::BTreeMap;

/// The full in-memory mapping held by the store.
pub type EntryMap = BTreeMap<DateKey, Entry>;

/// Serializes the whole mapping into the blob text.
pub fn encode_entries(entries: &EntryMap) -> StorageResult<String> {
    serde_json::to_string(entries).map_err(StorageError::Encode)
}

/// Parses blob text back into a mapping.
///
/// # Errors
///
/// Returns `StorageError::Decode` when the text is not JSON, is not an object,
/// has a key that is not a `YYYY-MM-DD` date, or has a value without a
/// `lines` array of strings.
pub fn decode_entries(blob: &str) -> StorageResult<EntryMap> {
    serde_json::from_str(blob).map_err(StorageError::Decode)
}
