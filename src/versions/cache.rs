//! In-memory cache whose entries expire a fixed time after they were written

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

struct Entry<V> {
    value: V,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Key/value cache with one time-to-live shared by every entry
///
/// Safe to share between threads. Writes are last-writer-wins per key and
/// every `put` restarts that entry's TTL. Expired entries are dropped lazily
/// on the next read of the same key.
pub struct ExpiringCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes.saturating_mul(60)))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// A panic while holding the lock cannot leave the map half-written,
    /// so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the value for `key` if it was written less than one TTL ago
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = Instant::now();
        let mut entries = self.lock();

        let expired = match entries.get(key) {
            Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!("Dropping expired cache entry");
            entries.remove(key);
        }

        None
    }

    /// Stores `value` under `key`, replacing any previous entry
    pub fn put(&self, key: K, value: V) {
        let expires_at = Instant::now().checked_add(self.ttl);
        self.lock().insert(key, Entry { value, expires_at });
    }

    /// Number of entries that have not expired yet
    pub fn live_len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn cache() -> ExpiringCache<String, String> {
        ExpiringCache::from_minutes(10)
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        assert_eq!(cache().get("missing"), None);
    }

    #[test]
    fn get_returns_value_written_by_put() {
        let cache = cache();
        cache.put("key".to_string(), "1.2.3".to_string());

        assert_eq!(cache.get("key"), Some("1.2.3".to_string()));
    }

    #[test]
    fn put_overwrites_existing_value() {
        let cache = cache();
        cache.put("key".to_string(), "1.2.3".to_string());
        cache.put("key".to_string(), "1.2.4".to_string());

        assert_eq!(cache.get("key"), Some("1.2.4".to_string()));
        assert_eq!(cache.live_len(), 1);
    }

    #[test]
    fn from_minutes_sets_ttl() {
        assert_eq!(cache().ttl(), Duration::from_secs(600));
    }

    #[test]
    fn from_minutes_saturates_huge_ttl() {
        let cache: ExpiringCache<String, String> = ExpiringCache::from_minutes(u64::MAX);
        assert_eq!(cache.ttl(), Duration::from_secs(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn put_with_unrepresentable_ttl_never_expires() {
        let cache: ExpiringCache<String, String> = ExpiringCache::from_minutes(u64::MAX / 120);
        cache.put("key".to_string(), "1.2.3".to_string());

        tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;

        assert_eq!(cache.get("key"), Some("1.2.3".to_string()));
        assert_eq!(cache.live_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn get_returns_value_just_before_ttl_elapses() {
        let cache = cache();
        cache.put("key".to_string(), "1.2.3".to_string());

        tokio::time::advance(Duration::from_secs(599)).await;

        assert_eq!(cache.get("key"), Some("1.2.3".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn get_returns_none_once_ttl_elapses() {
        let cache = cache();
        cache.put("key".to_string(), "1.2.3".to_string());

        tokio::time::advance(Duration::from_secs(600)).await;

        assert_eq!(cache.get("key"), None);
        assert_eq!(cache.live_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn put_restarts_ttl_for_the_entry() {
        let cache = cache();
        cache.put("key".to_string(), "1.2.3".to_string());

        tokio::time::advance(Duration::from_secs(500)).await;
        cache.put("key".to_string(), "1.2.4".to_string());
        tokio::time::advance(Duration::from_secs(500)).await;

        assert_eq!(cache.get("key"), Some("1.2.4".to_string()));
    }

    #[test]
    fn concurrent_writers_leave_one_value_per_key() {
        let cache = Arc::new(cache());

        std::thread::scope(|scope| {
            for i in 0..8 {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    cache.put("key".to_string(), format!("1.0.{}", i));
                    cache.put(format!("key-{}", i), "x".to_string());
                });
            }
        });

        assert!(cache.get("key").is_some_and(|v| v.starts_with("1.0.")));
        assert_eq!(cache.live_len(), 9);
    }
}
