//! Client-side cache of localized content.
//!
//! The public pages keep the last localized list of each collection for a
//! day so repeat visits skip the network.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConsoleError;
use crate::models::Locale;

/// Hours a cached payload is served before it is fetched again.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Cached payload with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub data: Value,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Key-value storage behind the cache.
pub trait CacheStore: Send + Sync {
    fn load(&self, key: &str) -> impl Future<Output = Option<CachedEntry>> + Send;
    fn save(&self, key: &str, entry: &CachedEntry) -> impl Future<Output = ()> + Send;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CachedEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    async fn load(&self, key: &str) -> Option<CachedEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    async fn save(&self, key: &str, entry: &CachedEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), entry.clone());
    }
}

/// One JSON file per key under `dir`. Storage errors only disable caching.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl CacheStore for FileStore {
    async fn load(&self, key: &str) -> Option<CachedEntry> {
        let path = self.path_for(key);
        let raw = tokio::fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable cache file: {}", e);
                None
            }
        }
    }

    async fn save(&self, key: &str, entry: &CachedEntry) {
        let path = self.path_for(key);
        let result = async {
            let raw = serde_json::to_string(entry).map_err(std::io::Error::other)?;
            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&path, raw).await
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), "failed to write cache file: {}", e);
        }
    }
}

/// Cache key for a collection in one locale, e.g. `faq_hi`.
pub fn cache_key(content: &str, locale: Locale) -> String {
    format!("{}_{}", content, locale.code())
}

/// Read-through cache with a fixed time to live.
#[derive(Debug)]
pub struct ContentCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: CacheStore> ContentCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, Duration::hours(DEFAULT_TTL_HOURS))
    }

    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Cached data for the key if it is younger than the TTL at `now`.
    pub async fn get_fresh(
        &self,
        content: &str,
        locale: Locale,
        now: DateTime<Utc>,
    ) -> Option<Value> {
        let entry = self.store.load(&cache_key(content, locale)).await?;
        let age = now.timestamp_millis() - entry.timestamp;
        (age < self.ttl.num_milliseconds()).then_some(entry.data)
    }

    pub async fn put(&self, content: &str, locale: Locale, data: Value, now: DateTime<Utc>) {
        let entry = CachedEntry {
            data,
            timestamp: now.timestamp_millis(),
        };
        self.store.save(&cache_key(content, locale), &entry).await;
    }

    /// Serve fresh cached data, or run `fetch` and cache its result.
    ///
    /// A failed fetch leaves any stale entry in place.
    pub async fn read_through<F, Fut>(
        &self,
        content: &str,
        locale: Locale,
        now: DateTime<Utc>,
        fetch: F,
    ) -> Result<Value, ConsoleError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ConsoleError>>,
    {
        if let Some(data) = self.get_fresh(content, locale, now).await {
            tracing::debug!(content, locale = %locale, "cache hit");
            return Ok(data);
        }

        let data = fetch().await?;
        self.put(content, locale, data.clone(), now).await;
        Ok(data)
    }
}
