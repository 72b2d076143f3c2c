//! # FreshCache — time-based staleness for fetched lists
//!
//! The backend owns all data; views fetch on demand and re-fetch once the
//! local copy goes stale. One value per cache, with a TTL and hit/miss
//! counters. Stale reads return `None` so the caller re-fetches; a manual
//! `invalidate` forces the next read to miss (used after ack/review writes).

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub struct FreshCache<T: Clone> {
    slot: RwLock<Option<(Instant, T)>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T: Clone> FreshCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Fresh value, or `None` when empty or stale.
    pub fn get(&self) -> Option<T> {
        let slot = self.slot.read();
        match slot.as_ref() {
            Some((stored_at, value)) if stored_at.elapsed() <= self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, value: T) {
        *self.slot.write() = Some((Instant::now(), value));
    }

    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let cache = FreshCache::new(Duration::from_secs(60));
        assert!(cache.get().is_none());
        cache.put(vec![1, 2, 3]);
        assert_eq!(cache.get(), Some(vec![1, 2, 3]));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_invalidate() {
        let cache = FreshCache::new(Duration::from_secs(60));
        cache.put("alerts".to_string());
        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_zero_ttl_goes_stale() {
        let cache = FreshCache::new(Duration::from_secs(0));
        cache.put(1u32);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get().is_none());
    }
}
