//! Fetch-or-reuse over a transport and a persistent cache.
//!
//! ### Keys
//! - Pages: the URL string as given.
//! - API calls: base URL plus `name=value` pairs sorted on the rendered pair.
//!
//! ### Misses
//! - Wait the pacing interval, then call the transport.
//! - Store the result and rewrite the cache file before returning.
//! - Transport, decode and write failures propagate; nothing is cached for the key.
//!
//! ### Hits
//! - Served from memory with no delay and no network traffic.
//!
//! The cache sits behind one async mutex held for the whole
//! check-fetch-store sequence, so concurrent callers never fetch the same key
//! twice and back-to-back misses stay spaced by the pacing interval.

use serde_json::Value;
use shelfmap_core::cache::{composite_key, page_key};
use shelfmap_core::{CacheEntry, CacheStorage, Error, PersistentCache};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

use super::Transport;

/// Default delay paid before each uncached request.
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Caching front for a `Transport`.
pub struct CachedFetcher<T, S> {
    transport: T,
    cache: Mutex<PersistentCache<S>>,
    pacing: Duration,
}

impl<T: Transport, S: CacheStorage> CachedFetcher<T, S> {
    /// Wrap an already opened cache.
    pub fn new(transport: T, cache: PersistentCache<S>, pacing: Duration) -> Self {
        Self { transport, cache: Mutex::new(cache), pacing }
    }

    /// Load the cache from `storage` and wrap it.
    pub async fn open(transport: T, storage: S, pacing: Duration) -> Self {
        Self::new(transport, PersistentCache::open(storage).await, pacing)
    }

    /// Fetch a page as text, reusing the cached copy when there is one.
    pub async fn fetch_text(&self, url: &str) -> Result<String, Error> {
        let key = page_key(url);
        let mut cache = self.cache.lock().await;

        if let Some(entry) = cache.get(&key) {
            tracing::info!("using cache: {}", key);
            return Ok(entry.to_text());
        }

        tracing::info!("fetching: {}", key);
        tokio::time::sleep(self.pacing).await;
        let text = self.transport.get_text(url).await?;

        cache.insert(key, CacheEntry::Text(text.clone())).await?;
        Ok(text)
    }

    /// Call a parameterized API, reusing the cached response when there is one.
    pub async fn fetch_structured(&self, base_url: &str, params: &HashMap<String, String>) -> Result<Value, Error> {
        let key = composite_key(base_url, params);
        let mut cache = self.cache.lock().await;

        if let Some(entry) = cache.get(&key) {
            tracing::info!("using cache: {}", redact(base_url));
            return Ok(entry.to_structured());
        }

        tracing::info!("fetching: {}", redact(base_url));
        tokio::time::sleep(self.pacing).await;

        let mut pairs: Vec<(String, String)> = params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        pairs.sort();
        let value = self.transport.get_structured(base_url, &pairs).await?;

        cache.insert(key, CacheEntry::Structured(value.clone())).await?;
        Ok(value)
    }

    /// Whether a page is already cached.
    pub async fn has_text(&self, url: &str) -> bool {
        self.cache.lock().await.contains(&page_key(url))
    }

    /// Whether an API response is already cached.
    pub async fn has_structured(&self, base_url: &str, params: &HashMap<String, String>) -> bool {
        self.cache.lock().await.contains(&composite_key(base_url, params))
    }

    /// Number of cached entries.
    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// API keys ride in the query string; log only the base URL.
fn redact(base_url: &str) -> &str {
    base_url.split('?').next().unwrap_or(base_url)
}
