//! Caller-side result cache
//!
//! The analyzers are pure and never consult this cache. Callers that run the
//! engine repeatedly for the same user can memoize results here for a short
//! freshness window. Every operation takes an explicit `now` so expiry is
//! deterministic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cache settings as stored in the application config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Disabled caches always recompute
    pub enabled: bool,

    /// Freshness window in minutes (default: 5)
    pub ttl_minutes: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            enabled: true,
            ttl_minutes: 5,
        }
    }
}

/// Hit/miss counters and current size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheMetrics {
    /// Share of lookups served from the cache, 0.0 before any lookup
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, CachedEntry<V>>,
    hits: u64,
    misses: u64,
}

/// TTL memo keyed by user id
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone)]
pub struct AnalyticsCache<V> {
    settings: CacheSettings,
    state: Arc<Mutex<CacheState<V>>>,
}

impl<V: Clone> AnalyticsCache<V> {
    pub fn new(settings: CacheSettings) -> Self {
        AnalyticsCache {
            settings,
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
            })),
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    fn ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.settings.ttl_minutes))
    }

    fn is_fresh(&self, entry: &CachedEntry<V>, now: DateTime<Utc>) -> bool {
        now >= entry.stored_at && now - entry.stored_at < self.ttl()
    }

    // A panic while holding the lock cannot leave an entry half-written
    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh value for `user_id`, counting a hit or a miss
    pub fn get(&self, user_id: &str, now: DateTime<Utc>) -> Option<V> {
        if !self.settings.enabled {
            return None;
        }

        let mut state = self.lock();
        let fresh = state
            .entries
            .get(user_id)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value.clone());

        match fresh {
            Some(value) => {
                state.hits += 1;
                Some(value)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Store a value computed at `now`
    pub fn insert(&self, user_id: &str, value: V, now: DateTime<Utc>) {
        if !self.settings.enabled {
            return;
        }

        self.lock().entries.insert(
            user_id.to_string(),
            CachedEntry {
                value,
                stored_at: now,
            },
        );
    }

    /// Cached value if fresh, otherwise compute and store it
    ///
    /// Errors from `compute` are returned as-is and nothing is stored. The
    /// lock is not held while computing.
    pub fn get_or_compute<E, F>(&self, user_id: &str, now: DateTime<Utc>, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(user_id, now) {
            tracing::debug!(user_id, "Cache hit");
            return Ok(value);
        }

        let value = compute()?;
        self.insert(user_id, value.clone(), now);
        Ok(value)
    }

    /// Drop the entry for one user, e.g. after they log a workout
    pub fn invalidate(&self, user_id: &str) -> bool {
        self.lock().entries.remove(user_id).is_some()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl();
        let mut state = self.lock();
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| now >= entry.stored_at && now - entry.stored_at < ttl);
        let purged = before - state.entries.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired cache entries");
        }
        purged
    }

    pub fn metrics(&self) -> CacheMetrics {
        let state = self.lock();
        CacheMetrics {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::thread;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = AnalyticsCache::new(CacheSettings::default());
        cache.insert("user-1", 72u8, t0());

        assert_eq!(cache.get("user-1", t0() + Duration::minutes(4)), Some(72));
        assert_eq!(cache.get("user-1", t0() + Duration::minutes(5)), None);
        assert_eq!(cache.get("user-2", t0()), None);

        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 2);
        assert!((metrics.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_get_or_compute_only_computes_once() {
        let cache = AnalyticsCache::new(CacheSettings::default());
        let mut calls = 0;

        for _ in 0..3 {
            let value: Result<u32, String> = cache.get_or_compute("user-1", t0(), || {
                calls += 1;
                Ok(42)
            });
            assert_eq!(value, Ok(42));
        }
        assert_eq!(calls, 1);

        let failed: Result<u32, String> = cache.get_or_compute("user-2", t0(), || Err("boom".into()));
        assert!(failed.is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_and_purge() {
        let cache = AnalyticsCache::new(CacheSettings {
            enabled: true,
            ttl_minutes: 10,
        });
        cache.insert("a", "x".to_string(), t0());
        cache.insert("b", "y".to_string(), t0() + Duration::minutes(8));

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));

        cache.insert("a", "x".to_string(), t0());
        assert_eq!(cache.purge_expired(t0() + Duration::minutes(12)), 1);
        assert_eq!(cache.get("b", t0() + Duration::minutes(12)), Some("y".to_string()));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disabled_cache_never_stores() {
        let cache = AnalyticsCache::new(CacheSettings {
            enabled: false,
            ttl_minutes: 5,
        });
        cache.insert("user-1", 1u8, t0());
        assert!(cache.is_empty());
        assert_eq!(cache.get("user-1", t0()), None);
        assert_eq!(cache.metrics().misses, 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = AnalyticsCache::new(CacheSettings::default());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || cache.insert(&format!("user-{}", i), i, t0()))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 4);
    }
}
