//! Bulk sync support: request signatures, batch parsing, and per-item reports.
//!
//! Sync bodies are JSON arrays processed one item at a time. A bad item is reported and
//! skipped; it never aborts the rest of the batch.

pub mod report;
pub mod signature;

pub use report::SyncReport;
pub use signature::{SIGNATURE_HEADER, SignatureError, sign, tokens_match, verify};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Label used in error messages when an item carries no usable key.
pub const UNKNOWN_KEY: &str = "<unknown>";

/// Parses a sync body into its raw items.
///
/// # Errors
///
/// Returns an error if the body is not a JSON array.
pub fn parse_batch(body: &[u8]) -> Result<Vec<Value>, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Reads the string at `path` (e.g. `["title", "en"]`) for error messages.
#[must_use]
pub fn item_label(item: &Value, path: &[&str]) -> String {
    path.iter()
        .try_fold(item, |value, key| value.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(|| UNKNOWN_KEY.to_string(), str::to_string)
}

/// Deserializes one item into its typed patch.
///
/// # Errors
///
/// Returns the serde message when the item does not fit `T`.
pub fn parse_item<T: DeserializeOwned>(item: Value) -> Result<T, String> {
    serde_json::from_value(item).map_err(|e| e.to_string())
}
