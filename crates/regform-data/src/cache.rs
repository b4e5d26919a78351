//! Expiring dataset cache behind a key/value trait.
//!
//! Entries live under the namespaced key `formData_<dataset>` as
//! `{ data, timestamp }`. An absent or expired entry is a cache miss;
//! expiry is a configurable number of hours from write time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Default cache TTL in hours.
pub const DEFAULT_TTL_HOURS: i64 = 12;

/// Namespace prefix for cache keys.
pub(crate) const CACHE_KEY_PREFIX: &str = "formData_";

/// One cached dataset with its write timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
        }
    }

    /// Whether this entry is older than `ttl_hours`.
    pub fn is_expired(&self, ttl_hours: i64) -> bool {
        Utc::now() - self.timestamp > TimeDelta::hours(ttl_hours)
    }
}

/// Key/value persistence for cached datasets.
///
/// Implementations swallow their own I/O failures: a broken cache
/// degrades to a miss, never to a load error.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheEntry>;
    fn put(&self, key: &str, entry: &CacheEntry);
    fn remove(&self, key: &str);
}

/// File-backed cache: one JSON document per key inside a directory.
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.path_for(key);
        let contents = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(key, path = %path.display(), error = %err,
                    "discarding unreadable cache entry");
                None
            }
        }
    }

    fn put(&self, key: &str, entry: &CacheEntry) {
        if let Err(err) = self.write_atomic(&self.path_for(key), entry) {
            tracing::warn!(key, error = %err, "failed to persist cache entry");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(err) = std::fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(key, error = %err, "failed to remove cache entry");
            }
        }
    }
}

impl FileCacheStore {
    /// Write to a sibling temp file, then rename over the target, so a
    /// crash mid-write never leaves a truncated entry behind.
    fn write_atomic(&self, path: &Path, entry: &CacheEntry) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_string(entry).map_err(std::io::Error::other)?;
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, path)
    }
}

/// In-memory cache, used in tests and cache-disabled deployments that
/// still want per-process reuse semantics exercised.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, entry: &CacheEntry) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), entry.clone());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
