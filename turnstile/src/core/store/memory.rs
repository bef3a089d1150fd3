use super::{RateLimitRecord, Store};
use std::time::SystemTime;

#[cfg(feature = "ahash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "ahash"))]
use std::collections::HashMap;

// Configuration constants
const DEFAULT_CAPACITY: usize = 1000;
const CAPACITY_OVERHEAD_FACTOR: f64 = 1.3;

/// In-memory record store
///
/// One hash-map entry per identity key. Conditional writes are trivially
/// atomic here because the map has a single owner; the value of this
/// backend is that it exercises the exact same [`Store`] contract a
/// distributed backend must provide, so the engine and its tests run
/// unchanged against either.
///
/// # Example
///
/// ```
/// use turnstile::{MemoryStore, RateLimiter};
///
/// let store = MemoryStore::builder().capacity(100_000).build();
/// let limiter = RateLimiter::new(store);
/// ```
pub struct MemoryStore {
    data: HashMap<String, RateLimitRecord>,
}

/// Builder for configuring a MemoryStore
pub struct MemoryStoreBuilder {
    capacity: usize,
}

impl MemoryStore {
    /// Create a new MemoryStore with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new MemoryStore sized for `capacity` unique keys
    ///
    /// The map allocates 30% more space to reduce hash collisions.
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStore {
            // Pre-allocate with overhead to avoid rehashing
            data: HashMap::with_capacity((capacity as f64 * CAPACITY_OVERHEAD_FACTOR) as usize),
        }
    }

    /// Create a new builder for configuring a MemoryStore
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder {
            capacity: DEFAULT_CAPACITY,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<RateLimitRecord>, String> {
        Ok(self.data.get(key).cloned())
    }

    fn insert_if_absent(&mut self, key: &str, record: RateLimitRecord) -> Result<bool, String> {
        if self.data.contains_key(key) {
            return Ok(false);
        }
        self.data.insert(key.to_string(), record);
        Ok(true)
    }

    fn compare_and_swap(
        &mut self,
        key: &str,
        current: &RateLimitRecord,
        next: RateLimitRecord,
    ) -> Result<bool, String> {
        match self.data.get_mut(key) {
            Some(existing) if existing == current => {
                *existing = next;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn remove_older_than(&mut self, cutoff: SystemTime, limit: usize) -> Result<usize, String> {
        let stale: Vec<String> = self
            .data
            .iter()
            .filter(|(_, record)| record.last_request < cutoff)
            .take(limit)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.data.remove(key);
        }

        Ok(stale.len())
    }
}

impl Default for MemoryStoreBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl MemoryStoreBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected capacity (number of unique keys)
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build the MemoryStore with the configured settings
    pub fn build(self) -> MemoryStore {
        MemoryStore::with_capacity(self.capacity)
    }
}
