//! Cache Store Module
//!
//! Main cache engine: a lock-guarded HashMap of type-erased entries with TTL
//! expiration. Every operation is infallible from the caller's side; problems
//! are logged and degrade to a miss or a no-op.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::cache::{CacheEntry, CacheStats, StatsCounters, DEFAULT_TTL};

/// Outcome of the read-locked half of a lookup.
enum Lookup<T> {
    Hit(T),
    Expired,
    WrongType(&'static str),
}

// == Volatile Cache ==
/// Thread-safe in-memory cache with per-entry TTL.
#[derive(Debug)]
pub struct VolatileCache {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Performance statistics
    stats: StatsCounters,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl Default for VolatileCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl VolatileCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for entries stored without an explicit one
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: StatsCounters::new(),
            default_ttl,
        }
    }

    /// TTL used when `set` receives `None`.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` when the key is absent, expired, or holds a value of a
    /// different type. Expired entries are removed as part of the read.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone + Send + Sync,
    {
        let lookup = {
            let entries = self.entries.read().await;
            entries.get(key).map(|entry| {
                if entry.is_expired() {
                    Lookup::Expired
                } else {
                    match entry.value::<T>() {
                        Some(value) => Lookup::Hit(value),
                        None => Lookup::WrongType(entry.type_name()),
                    }
                }
            })
        };

        match lookup {
            Some(Lookup::Hit(value)) => {
                self.stats.record_hit();
                debug!("Cache hit for key: {}", key);
                Some(value)
            }
            Some(Lookup::Expired) => {
                let mut entries = self.entries.write().await;
                // A concurrent set may have replaced the entry since the read lock was released
                if entries.get(key).is_some_and(CacheEntry::is_expired) {
                    entries.remove(key);
                    self.stats.record_expirations(1);
                }
                self.stats.record_miss();
                debug!("Cache miss (expired) for key: {}", key);
                None
            }
            Some(Lookup::WrongType(stored)) => {
                self.stats.record_miss();
                error!(
                    "Error getting value from cache for key: {}: stored {}, requested {}",
                    key,
                    stored,
                    type_name::<T>()
                );
                None
            }
            None => {
                self.stats.record_miss();
                debug!("Cache miss for key: {}", key);
                None
            }
        }
    }

    // == Set ==
    /// Stores a value, overwriting any previous entry for the key.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the default TTL if None)
    pub async fn set<T>(&self, key: impl Into<String>, value: T, ttl: Option<Duration>)
    where
        T: Any + Send + Sync,
    {
        let key = key.into();
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl);

        self.entries.write().await.insert(key.clone(), entry);
        debug!("Cached value for key: {} with ttl: {:?}", key, ttl);
    }

    // == Remove ==
    /// Removes an entry by key. Removing an absent key is a no-op.
    ///
    /// Returns whether an entry was removed.
    pub async fn remove(&self, key: &str) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            debug!("Removed cache entry for key: {}", key);
        }
        removed
    }

    // == Remove By Pattern ==
    /// Removes every key containing `pattern` with all `*` characters stripped.
    ///
    /// This is plain substring matching, not a glob: `"pet_profile_*"` and
    /// `"*pet_profile_"` select the same keys. An all-wildcard pattern
    /// matches every key.
    ///
    /// Returns the number of entries removed.
    pub async fn remove_by_pattern(&self, pattern: &str) -> usize {
        let needle = pattern.replace('*', "");

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.contains(&needle));
        let removed = before - entries.len();

        debug!(
            "Removed {} cache entries matching pattern: {}",
            removed, pattern
        );
        removed
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();

        self.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.entries.read().await.len();
        self.stats.snapshot(total_entries)
    }

    // == Keys ==
    /// Snapshot of every stored key, including entries that have expired but
    /// not yet been evicted.
    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    // == Length ==
    /// Returns the current number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_store_new() {
        let cache = VolatileCache::default();
        assert_eq!(cache.len().await, 0);
        assert!(cache.is_empty().await);
        assert_eq!(cache.default_ttl(), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let cache = VolatileCache::default();

        cache.set("key1", "value1".to_string(), None).await;

        assert_eq!(cache.get::<String>("key1").await.as_deref(), Some("value1"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let cache = VolatileCache::default();
        assert!(cache.get::<String>("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn test_store_type_mismatch_is_miss() {
        let cache = VolatileCache::default();
        cache.set("number", 5u64, None).await;

        assert!(cache.get::<String>("number").await.is_none());
        // The entry itself survives a mismatched read
        assert_eq!(cache.get::<u64>("number").await, Some(5));

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_store_remove_is_idempotent() {
        let cache = VolatileCache::default();
        cache.set("key1", 1i32, None).await;

        assert!(cache.remove("key1").await);
        assert!(!cache.remove("key1").await);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let cache = VolatileCache::default();

        cache.set("key1", "value1".to_string(), None).await;
        cache.set("key1", "value2".to_string(), None).await;

        assert_eq!(cache.get::<String>("key1").await.as_deref(), Some("value2"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration_evicts_on_read() {
        let cache = VolatileCache::default();
        cache.set("key1", 1i32, Some(Duration::from_secs(1))).await;

        assert_eq!(cache.get::<i32>("key1").await, Some(1));

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert!(cache.get::<i32>("key1").await.is_none());
        assert!(cache.keys().await.is_empty());
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_all_profiles_scenario() {
        let cache = VolatileCache::new(10 * MINUTE);
        cache
            .set(crate::cache::keys::ALL_PET_PROFILES, vec!["rex", "tom"], None)
            .await;

        tokio::time::advance(9 * MINUTE).await;
        assert_eq!(
            cache.get::<Vec<&str>>(crate::cache::keys::ALL_PET_PROFILES).await,
            Some(vec!["rex", "tom"])
        );

        tokio::time::advance(2 * MINUTE).await;
        assert_eq!(cache.cleanup_expired().await, 1);
        assert!(cache
            .get::<Vec<&str>>(crate::cache::keys::ALL_PET_PROFILES)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_store_remove_by_pattern() {
        let cache = VolatileCache::default();
        cache.set("all_pet_profiles", 0i32, None).await;
        cache.set("pet_profile_1", 1i32, None).await;
        cache.set("pet_profile_22", 22i32, None).await;
        cache.set("owner_1", 1i32, None).await;

        let removed = cache.remove_by_pattern("pet_profile_*").await;

        assert_eq!(removed, 2);
        let mut keys = cache.keys().await;
        keys.sort();
        assert_eq!(keys, vec!["all_pet_profiles", "owner_1"]);
    }

    #[tokio::test]
    async fn test_store_remove_by_pattern_is_substring_not_glob() {
        let cache = VolatileCache::default();
        cache.set("x_profile_y", 0i32, None).await;
        cache.set("profile", 0i32, None).await;
        cache.set("other", 0i32, None).await;

        // Leading and trailing wildcards are both just stripped
        assert_eq!(cache.remove_by_pattern("*profile*").await, 2);
        assert_eq!(cache.keys().await, vec!["other"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_cleanup_expired() {
        let cache = VolatileCache::default();
        cache.set("key1", 1i32, Some(Duration::from_secs(1))).await;
        cache.set("key2", 2i32, Some(Duration::from_secs(10))).await;

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert_eq!(cache.cleanup_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get::<i32>("key2").await, Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_store_concurrent_access() {
        let cache = Arc::new(VolatileCache::default());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    let key = format!("key{}", i % 4);
                    for n in 0..100 {
                        cache.set(key.clone(), n, None).await;
                        let _ = cache.get::<i32>(&key).await;
                        if n % 10 == 0 {
                            cache.remove(&key).await;
                        }
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert!(cache.len().await <= 4);
    }
}
