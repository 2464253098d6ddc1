//! Unwrapping of directory endpoint responses.
//!
//! The endpoint returns either a bare array of records or an object with an
//! `items` array and an optional `lastUpdated`/`updatedAt` stamp. Any other
//! shape is treated as an empty directory rather than an error.

use crate::directory::activity::ActivityRule;
use crate::directory::model::{DirectoryRecord, normalize_record};
use crate::text::safe_text;
use serde_json::Value;

const ITEMS_KEY: &str = "items";
const LAST_UPDATED_KEYS: &[&str] = &["lastUpdated", "updatedAt"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Records and metadata extracted from one response body.
pub struct DirectoryPayload {
    pub records: Vec<DirectoryRecord>,
    /// Raw entries seen before the activity filter.
    pub total_raw: usize,
    pub last_updated: Option<String>,
}

/// The list of raw entries in a response; empty for unexpected shapes.
pub fn raw_items(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get(ITEMS_KEY) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    }
}

/// First non-empty update stamp, passed through as text.
pub fn last_updated(payload: &Value) -> Option<String> {
    LAST_UPDATED_KEYS
        .iter()
        .map(|key| safe_text(payload.get(*key)))
        .find(|stamp| !stamp.is_empty())
}

/// Filter inactive entries and normalize the rest, preserving order.
pub fn parse_directory_payload(payload: &Value, rule: &ActivityRule) -> DirectoryPayload {
    let items = raw_items(payload);
    let records = items
        .iter()
        .filter(|raw| rule.is_active(raw))
        .map(|raw| normalize_record(Some(raw)))
        .collect();
    DirectoryPayload {
        records,
        total_raw: items.len(),
        last_updated: last_updated(payload),
    }
}
