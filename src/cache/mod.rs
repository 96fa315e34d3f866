//! Cache module for storing Distance Matrix responses
//!
//! Responses are cached as raw JSON values keyed by a request fingerprint. Every
//! backend implements [`CacheStore`], which offers whole-value get/set/delete with
//! TTL expiry plus a prefix-based bulk delete so a namespace can be wiped without
//! touching unrelated entries.

mod manager;
mod memory;

pub use manager::{CacheManager, CachedData};
pub use memory::MemoryCache;

use serde_json::Value;
use thiserror::Error;

/// Errors raised by a cache backend
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be serialized
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend lock was poisoned by a panicking writer
    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Key-value store with TTL expiry and prefix deletion
///
/// Implementations must treat each value atomically: a reader sees either the
/// whole previous value or the whole new one.
pub trait CacheStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if missing or expired.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, expiring `ttl_seconds` from now.
    fn set(&self, key: &str, value: &Value, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Removes a single entry. Returns `true` if something was deleted.
    fn delete(&self, key: &str) -> bool;

    /// Removes every entry whose key starts with `prefix` and returns how many went.
    fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError>;
}
