//! Persistent request cache.
//!
//! This module provides a key-value cache kept in one JSON file. It supports:
//!
//! - Page keys (the URL) and composite keys (URL plus sorted query pairs)
//! - Text and structured payloads side by side
//! - Fail-open loading: missing or corrupt storage is an empty cache
//! - Write-through: the whole store is saved after every insertion

pub mod key;
pub mod persistent;
pub mod storage;
pub mod store;

pub use crate::Error;

pub use key::{composite_key, page_key};
pub use persistent::PersistentCache;
pub use storage::{CacheStorage, JsonFileStorage, MemoryStorage};
pub use store::{CacheEntry, CacheStore};
