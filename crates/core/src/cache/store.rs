//! In-memory cache contents.
//!
//! The store serializes as a flat JSON object, key to entry, with no
//! per-entry metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A cached response payload.
///
/// Text entries hold page bodies; structured entries hold decoded API
/// responses. On disk a text entry is a JSON string and a structured entry is
/// any JSON value, so a structured value that happens to be a bare string reads
/// back as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheEntry {
    Text(String),
    Structured(Value),
}

impl CacheEntry {
    /// The entry as text. Structured entries are rendered as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            CacheEntry::Text(text) => text.clone(),
            CacheEntry::Structured(value) => value.to_string(),
        }
    }

    /// The entry as a structured value. Text entries become JSON strings.
    pub fn to_structured(&self) -> Value {
        match self {
            CacheEntry::Text(text) => Value::String(text.clone()),
            CacheEntry::Structured(value) => value.clone(),
        }
    }
}

impl From<String> for CacheEntry {
    fn from(text: String) -> Self {
        CacheEntry::Text(text)
    }
}

impl From<Value> for CacheEntry {
    fn from(value: Value) -> Self {
        CacheEntry::Structured(value)
    }
}

/// Mapping from cache key to cached payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert an entry, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
