//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries, whether
//! or not they are ever read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::VolatileCache;

/// Owns the running sweep task. Dropping the handle stops the sweep.
#[derive(Debug)]
pub struct SweepHandle {
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Stops the sweep task.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Returns true once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a background task that evicts expired entries every `interval`.
///
/// The first sweep runs one full interval after spawning.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(VolatileCache::default());
/// let sweep = spawn_sweep_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// drop(sweep);
/// ```
pub fn spawn_sweep_task(cache: Arc<VolatileCache>, interval: Duration) -> SweepHandle {
    let handle = tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    });

    SweepHandle { handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_unread_expired_entries() {
        let cache = Arc::new(VolatileCache::default());
        cache.set("expire_soon", "value".to_string(), Some(Duration::from_secs(1))).await;

        let _sweep = spawn_sweep_task(cache.clone(), MINUTE);

        // Let the sweep task register its timer before moving the clock
        tokio::task::yield_now().await;
        tokio::time::sleep(MINUTE + Duration::from_millis(10)).await;

        assert!(cache.keys().await.is_empty(), "Expired entry should have been swept");
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_preserves_valid_entries() {
        let cache = Arc::new(VolatileCache::default());
        cache.set("long_lived", "value".to_string(), Some(Duration::from_secs(3600))).await;

        let _sweep = spawn_sweep_task(cache.clone(), MINUTE);

        tokio::task::yield_now().await;
        tokio::time::sleep(2 * MINUTE + Duration::from_millis(10)).await;

        assert_eq!(cache.get::<String>("long_lived").await.as_deref(), Some("value"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_profiles_purged_by_next_tick() {
        let cache = Arc::new(VolatileCache::default());
        let _sweep = spawn_sweep_task(cache.clone(), MINUTE);
        tokio::task::yield_now().await;

        cache
            .set(crate::cache::keys::ALL_PET_PROFILES, vec![1, 2, 3], Some(10 * MINUTE))
            .await;

        tokio::time::sleep(9 * MINUTE).await;
        assert!(cache.keys().await.contains(&"all_pet_profiles".to_string()));

        // Nobody reads the key again; the sweep alone removes it
        tokio::time::sleep(2 * MINUTE + Duration::from_millis(10)).await;
        assert!(cache.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_can_be_aborted() {
        let cache = Arc::new(VolatileCache::default());

        let sweep = spawn_sweep_task(cache, Duration::from_secs(1));
        sweep.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sweep.is_finished(), "Task should be finished after abort");
    }
}
