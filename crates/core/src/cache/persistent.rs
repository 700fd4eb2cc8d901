//! Store plus backing storage, kept in step.
//!
//! Every insertion rewrites the whole store before returning, so the process
//! can stop at any point and lose at most the entry being written.

use super::storage::CacheStorage;
use super::store::{CacheEntry, CacheStore};
use crate::Error;

/// A `CacheStore` loaded from, and saved to, a `CacheStorage` backend.
#[derive(Debug)]
pub struct PersistentCache<S> {
    storage: S,
    store: CacheStore,
}

impl<S: CacheStorage> PersistentCache<S> {
    /// Load the store from `storage`. An unreadable backend yields an empty cache.
    pub async fn open(storage: S) -> Self {
        let store = storage.load().await;
        Self { storage, store }
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.store.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    /// Insert an entry and persist the whole store.
    ///
    /// If the write fails the in-memory store is put back the way it was, so a
    /// failed insert leaves no trace for that key.
    pub async fn insert(&mut self, key: impl Into<String>, entry: CacheEntry) -> Result<(), Error> {
        let key = key.into();
        let previous = self.store.insert(key.clone(), entry);

        if let Err(e) = self.storage.save(&self.store).await {
            match previous {
                Some(previous) => {
                    self.store.insert(key, previous);
                }
                None => {
                    self.store.remove(&key);
                }
            }
            return Err(e);
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
