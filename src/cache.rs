// Client-side query cache
// TTL cache over decoded responses with prefix invalidation on mutation

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Thread-safe cache for GET responses, keyed by path plus query.
///
/// Mutations invalidate their resource prefix so readers never observe
/// entries older than the last write made through this process.
pub struct QueryCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// A zero-TTL cache never stores or serves anything
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if self.ttl.is_zero() {
            return None;
        }
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: &T) {
        if self.ttl.is_zero() {
            return;
        }
        if let Ok(value) = serde_json::to_value(value) {
            self.entries.insert(
                key.to_string(),
                CacheEntry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    /// Drop every entry whose key starts with `prefix`
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.entries.retain(|key, _| !key.starts_with(prefix));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
