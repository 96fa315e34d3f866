//! In-process cache backend

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{CacheError, CacheStore};

/// Cache held in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Value, DateTime<Utc>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        let (value, expires_at) = entries.get(key)?;
        if Utc::now() >= *expires_at {
            return None;
        }
        Some(value.clone())
    }

    fn set(&self, key: &str, value: &Value, ttl_seconds: u64) -> Result<(), CacheError> {
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(Duration::try_seconds(ttl).unwrap_or(Duration::MAX))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_string(), (value.clone(), expires_at));
        Ok(())
    }

    fn delete(&self, key: &str) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => entries.remove(key).is_some(),
            Err(_) => false,
        }
    }

    fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("k", &json!({"status": "OK"}), 300).unwrap();

        assert_eq!(cache.get("k"), Some(json!({"status": "OK"})));
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let cache = MemoryCache::new();
        cache.set("k", &json!(1), 0).unwrap();

        assert!(cache.get("k").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_delete_by_prefix_counts_removed() {
        let cache = MemoryCache::new();
        cache.set("distmatrix_1", &json!(1), 300).unwrap();
        cache.set("distmatrix_2", &json!(2), 300).unwrap();
        cache.set("other", &json!(3), 300).unwrap();

        assert_eq!(cache.delete_by_prefix("distmatrix_").unwrap(), 2);
        assert_eq!(cache.get("other"), Some(json!(3)));
        assert!(!cache.delete("distmatrix_1"));
    }
}
