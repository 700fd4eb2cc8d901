//! Durable backing for the cache store.
//!
//! A backend only moves raw text in and out. Decoding and the fail-open
//! policy live in the provided `load`/`save` methods so every backend
//! behaves the same way.

use super::store::CacheStore;
use crate::Error;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Storage backend holding one serialized `CacheStore`.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Read the raw serialized store. `Ok(None)` means nothing was ever saved.
    async fn read(&self) -> Result<Option<String>, Error>;

    /// Overwrite the serialized store.
    async fn write(&self, contents: String) -> Result<(), Error>;

    /// Load the store, treating every read or decode failure as an empty cache.
    ///
    /// A missing or corrupt cache file only costs a full cache miss, so this
    /// never fails.
    async fn load(&self) -> CacheStore {
        let raw = match self.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no cache stored yet, starting empty");
                return CacheStore::new();
            }
            Err(e) => {
                tracing::warn!("failed to read cache, starting empty: {}", e);
                return CacheStore::new();
            }
        };

        if raw.trim().is_empty() {
            tracing::debug!("cache storage is empty, starting empty");
            return CacheStore::new();
        }

        match serde_json::from_str::<CacheStore>(&raw) {
            Ok(store) => {
                tracing::debug!("loaded {} cache entries", store.len());
                store
            }
            Err(e) => {
                tracing::warn!("cache contents are not a valid store, starting empty: {}", e);
                CacheStore::new()
            }
        }
    }

    /// Serialize the whole store and overwrite the backing storage.
    async fn save(&self, store: &CacheStore) -> Result<(), Error> {
        let contents = serde_json::to_string(store).map_err(|e| Error::CacheEncode(e.to_string()))?;
        self.write(contents).await
    }
}

/// Cache stored as a single JSON file.
///
/// Writes go to a sibling temp file that is then renamed over the target, so a
/// crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CacheStorage for JsonFileStorage {
    async fn read(&self) -> Result<Option<String>, Error> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| Error::CacheRead(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::CacheRead(format!("{}: {}", self.path.display(), e))),
        }
    }

    async fn write(&self, contents: String) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::CacheWrite(format!("{}: {}", parent.display(), e)))?;
        }

        let temp = self.temp_path();
        if let Err(e) = tokio::fs::write(&temp, contents.as_bytes()).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(Error::CacheWrite(format!("{}: {}", temp.display(), e)));
        }
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(Error::CacheWrite(format!("{}: {}", self.path.display(), e)));
        }

        tracing::debug!("wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}

/// Cache held in memory, for tests and throwaway runs.
///
/// Counts writes so callers can assert how often the store was persisted.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<String>>,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw contents already "on disk".
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self { contents: Mutex::new(Some(contents.into())), ..Default::default() }
    }

    /// A backend whose every write fails.
    pub fn failing() -> Self {
        Self::new().with_failing_writes()
    }

    /// Make every subsequent write fail.
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The last written contents.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<String>, Error> {
        Ok(self.contents())
    }

    async fn write(&self, contents: String) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::CacheWrite("memory storage is read-only".into()));
        }

        let mut slot = self
            .contents
            .lock()
            .map_err(|_| Error::CacheWrite("memory storage lock poisoned".into()))?;
        *slot = Some(contents);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Shared backends, so a test can keep a handle while the cache owns another.
#[async_trait]
impl<S: CacheStorage + ?Sized> CacheStorage for std::sync::Arc<S> {
    async fn read(&self) -> Result<Option<String>, Error> {
        (**self).read().await
    }

    async fn write(&self, contents: String) -> Result<(), Error> {
        (**self).write(contents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::CacheEntry;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_store() -> CacheStore {
        let mut store = CacheStore::new();
        store.insert("https://example.test/a", CacheEntry::Text("PAGE_A".into()));
        store.insert("https://api.test/search?limit=5&term=x", CacheEntry::Structured(json!({"total": 1})));
        store
    }

    #[tokio::test]
    async fn test_file_missing_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("cache.json"));

        let store = storage.load().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_file_empty_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "").unwrap();

        let store = JsonFileStorage::new(&path).load().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_file_garbage_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{\"https://example.test/a\": \"PAGE").unwrap();

        let store = JsonFileStorage::new(&path).load().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_file_binary_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let store = JsonFileStorage::new(&path).load().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_file_invalid_utf8_in_value_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, b"{\"https://example.test/a\": \"PAGE\xffA\"}").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.read().await, Err(Error::CacheRead(_))));
        assert!(storage.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_file_unreadable_loads_empty() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the read itself fail.
        let path = dir.path().join("cache.json");
        std::fs::create_dir(&path).unwrap();

        let store = JsonFileStorage::new(&path).load().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_file_save_then_load() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("cache.json"));
        let store = sample_store();

        storage.save(&store).await.unwrap();
        let loaded = JsonFileStorage::new(storage.path()).load().await;

        assert_eq!(loaded, store);
        assert!(!storage.temp_path().exists(), "temp file should be renamed away");
    }

    #[tokio::test]
    async fn test_file_save_writes_flat_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let mut store = CacheStore::new();
        store.insert("https://example.test/a", CacheEntry::Text("PAGE_A".into()));

        JsonFileStorage::new(&path).save(&store).await.unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"https://example.test/a": "PAGE_A"}));
    }

    #[tokio::test]
    async fn test_file_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache").join("cache.json");

        JsonFileStorage::new(&path).save(&sample_store()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_file_save_unwritable_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let storage = JsonFileStorage::new(blocker.join("cache.json"));

        let result = storage.save(&sample_store()).await;
        assert!(matches!(result, Err(Error::CacheWrite(_))));
    }

    #[tokio::test]
    async fn test_file_failed_rename_removes_temp() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory at the target path makes the rename fail.
        let path = dir.path().join("cache.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();
        let storage = JsonFileStorage::new(&path);

        let result = storage.save(&sample_store()).await;
        assert!(matches!(result, Err(Error::CacheWrite(_))));
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let storage = JsonFileStorage::new("/var/cache/shelfmap.json");
        assert_eq!(storage.temp_path(), PathBuf::from("/var/cache/shelfmap.json.tmp"));
    }

    #[tokio::test]
    async fn test_memory_storage_counts_writes() {
        let storage = MemoryStorage::new();
        assert!(storage.load().await.is_empty());

        storage.save(&sample_store()).await.unwrap();
        storage.save(&sample_store()).await.unwrap();

        assert_eq!(storage.writes(), 2);
        assert_eq!(storage.load().await, sample_store());
    }

    #[tokio::test]
    async fn test_memory_storage_corrupt_contents() {
        let storage = MemoryStorage::with_contents("not json at all");
        assert!(storage.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_memory_storage_failing() {
        let storage = MemoryStorage::failing();
        let result = storage.save(&sample_store()).await;
        assert!(matches!(result, Err(Error::CacheWrite(_))));
        assert_eq!(storage.writes(), 0);
    }
}
