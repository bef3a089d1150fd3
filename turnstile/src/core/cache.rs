//! Optional decision-snapshot tier
//!
//! Repeated checks for a hot key can be answered from a short-TTL snapshot
//! of the last decision instead of a store round-trip. A cached "allowed"
//! can be stale — another process may have exhausted the quota since — so
//! the tier trades strict accuracy for latency and is subordinate to the
//! store for correctness. The [`NoCache`] implementation is the identity
//! strategy (every lookup misses) and is the default wiring; disabling the
//! cache changes latency, never correctness.

use super::limiter::Decision;
use std::time::{Duration, SystemTime};

#[cfg(feature = "ahash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "ahash"))]
use std::collections::HashMap;

const DEFAULT_CAPACITY: usize = 1000;

/// Strategy seam for the decision cache
///
/// The limiter facade is unaware of which implementation is wired in.
pub trait DecisionCache {
    /// A snapshot for `key` younger than the TTL, if any
    fn get(&self, key: &str, now: SystemTime) -> Option<Decision>;

    /// Store (or overwrite) the snapshot for `key`
    fn put(&mut self, key: &str, decision: Decision, now: SystemTime);

    /// Drop entries older than the TTL, returning how many were dropped
    ///
    /// Intended to run on a periodic schedule owned by the caller.
    fn evict_expired(&mut self, now: SystemTime) -> usize;
}

/// The always-miss cache: every check consults the authoritative store.
pub struct NoCache;

impl DecisionCache for NoCache {
    fn get(&self, _key: &str, _now: SystemTime) -> Option<Decision> {
        None
    }

    fn put(&mut self, _key: &str, _decision: Decision, _now: SystemTime) {}

    fn evict_expired(&mut self, _now: SystemTime) -> usize {
        0
    }
}

struct CacheEntry {
    decision: Decision,
    stored_at: SystemTime,
}

/// Time-stamped decision snapshots with a fixed TTL.
///
/// Entries expire on read; [`evict_expired`](DecisionCache::evict_expired)
/// reclaims the memory of entries nobody reads again.
pub struct TtlCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl TtlCache {
    /// Create a cache whose snapshots live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    /// Create a cache sized for `capacity` hot keys
    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        TtlCache {
            entries: HashMap::with_capacity(capacity),
            ttl,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: SystemTime) -> bool {
        match now.duration_since(entry.stored_at) {
            Ok(age) => age < self.ttl,
            Err(_) => true,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for TtlCache {
    /// A cache with the reference 10 second TTL
    fn default() -> Self {
        Self::new(Duration::from_millis(10_000))
    }
}

impl DecisionCache for TtlCache {
    fn get(&self, key: &str, now: SystemTime) -> Option<Decision> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.decision.clone())
    }

    fn put(&mut self, key: &str, decision: Decision, now: SystemTime) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                decision,
                stored_at: now,
            },
        );
    }

    fn evict_expired(&mut self, now: SystemTime) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| match now.duration_since(entry.stored_at) {
            Ok(age) => age < ttl,
            Err(_) => true,
        });
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(remaining: u32, reset_at: SystemTime) -> Decision {
        Decision {
            allowed: true,
            remaining,
            reset_at,
        }
    }

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn hit_within_ttl_miss_after() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        cache.put("key", decision(5, at(160)), at(100));

        assert!(cache.get("key", at(109)).is_some());
        assert!(cache.get("key", at(110)).is_none());
    }

    #[test]
    fn put_overwrites_existing_snapshot() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        cache.put("key", decision(5, at(160)), at(100));
        cache.put("key", decision(4, at(160)), at(101));

        let hit = cache.get("key", at(102)).unwrap();
        assert_eq!(hit.remaining, 4);
    }

    #[test]
    fn evict_drops_only_stale_entries() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        cache.put("old", decision(5, at(160)), at(100));
        cache.put("new", decision(5, at(160)), at(105));

        assert_eq!(cache.evict_expired(at(112)), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new", at(112)).is_some());

        // Nothing left to evict
        assert_eq!(cache.evict_expired(at(112)), 0);
    }

    #[test]
    fn no_cache_never_hits() {
        let mut cache = NoCache;
        cache.put("key", decision(5, at(160)), at(100));

        assert!(cache.get("key", at(100)).is_none());
        assert_eq!(cache.evict_expired(at(100)), 0);
    }
}
