//! Cache manager for persisting API responses to disk
//!
//! Provides a `CacheManager` that stores serializable data to JSON files with
//! expiry timestamps. It backs the [`CacheStore`] used by the Distance Matrix client.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use super::{CacheError, CacheStore};

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Manages reading and writing cached data to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/distmatrix/` on Linux). Each cache entry includes an expiry timestamp.
/// `read` still hands back expired entries flagged with `is_expired`, while the
/// [`CacheStore`] view treats them as absent.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "distmatrix")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes data to the cache with a specified TTL in seconds
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the cache entry
    /// * `data` - The data to cache (must implement Serialize)
    /// * `ttl_seconds` - How long the cache entry should be considered fresh
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl_seconds: u64) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let now = Utc::now();
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        let expires_at = now
            .checked_add_signed(Duration::try_seconds(ttl).unwrap_or(Duration::MAX))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at,
        };

        let json = serde_json::to_string(&entry)?;
        fs::write(self.cache_path(key), json)?;
        Ok(())
    }

    /// Reads data from the cache
    ///
    /// Returns `None` if the cache entry doesn't exist or cannot be parsed.
    /// Returns `Some(CachedData)` with `is_expired = true` if the entry exists but has expired.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let path = self.cache_path(key);
        let content = fs::read_to_string(path).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;

        let now = Utc::now();
        let is_expired = now >= entry.expires_at;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired,
        })
    }
}

impl CacheStore for CacheManager {
    fn get(&self, key: &str) -> Option<Value> {
        let cached = self.read::<Value>(key)?;
        if cached.is_expired {
            debug!(key, "Cache entry expired");
            return None;
        }
        Some(cached.data)
    }

    fn set(&self, key: &str, value: &Value, ttl_seconds: u64) -> Result<(), CacheError> {
        self.write(key, value, ttl_seconds)
    }

    fn delete(&self, key: &str) -> bool {
        fs::remove_file(self.cache_path(key)).is_ok()
    }

    fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            // Nothing was ever cached
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let prefix = sanitize_key(prefix);
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            let matches = path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| stem.starts_with(&prefix));
            if matches {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        debug!(prefix = %prefix, removed, "Deleted cache entries by prefix");
        Ok(removed)
    }
}

/// Maps a key onto a safe file stem
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
