//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry holding a type-erased value.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    value: Arc<dyn Any + Send + Sync>,
    /// Type name of the stored value, kept for diagnostics
    type_name: &'static str,
    /// Creation instant
    pub created_at: Instant,
    /// Expiration instant
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Time to live
    pub fn new<T>(value: T, ttl: Duration) -> Self
    where
        T: Any + Send + Sync,
    {
        let now = Instant::now();

        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired only once the current time is strictly past its
    /// expiration instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiration against a caller-supplied instant, so a sweep can use
    /// one clock reading for every entry.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    // == Value Access ==
    /// Returns a clone of the stored value if it was stored as a `T`.
    pub fn value<T>(&self) -> Option<T>
    where
        T: Any + Clone,
    {
        self.value.downcast_ref::<T>().cloned()
    }

    /// Type name of the stored value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    // == Time To Live ==
    /// Returns the remaining TTL, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("type_name", &self.type_name)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(60));

        assert_eq!(entry.value::<String>().as_deref(), Some("test_value"));
        assert!(!entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::new(42u32, Duration::from_secs(1));

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(1u8, Duration::from_secs(5));

        // Exactly at the expiration instant the entry is still live
        assert!(!entry.is_expired_at(entry.expires_at));
        assert!(entry.is_expired_at(entry.expires_at + Duration::from_millis(1)));
    }

    #[tokio::test]
    async fn test_value_type_mismatch() {
        let entry = CacheEntry::new(vec![1, 2, 3], Duration::from_secs(60));

        assert!(entry.value::<String>().is_none());
        assert_eq!(entry.value::<Vec<i32>>(), Some(vec![1, 2, 3]));
        assert!(entry.type_name().contains("Vec"));
    }
}
