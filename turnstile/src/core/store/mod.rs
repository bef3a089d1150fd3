//! Record storage for admission-control state
//!
//! The [`Store`] trait is the transactional seam of the engine: one record
//! per identity key, mutated only through primitives that fail instead of
//! overwriting concurrent work. The engine composes them into an atomic
//! check-and-increment; any backend that can honor the compare-and-swap
//! contract — an in-memory map, a relational row under `SELECT ... FOR
//! UPDATE`, a document-store transaction — can sit behind this trait.

use std::time::SystemTime;

mod memory;

pub use memory::{MemoryStore, MemoryStoreBuilder};

#[cfg(test)]
mod tests;

/// Per-key admission state, the persisted unit of the store.
///
/// Created on the first check for a key, mutated in place by later checks,
/// and deleted only by the retention sweeper. Invariants: `count` never
/// exceeds the configured ceiling, and `window_start <= last_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Requests admitted in the current window
    pub count: u32,
    /// Instant the current window began
    pub window_start: SystemTime,
    /// Instant of the most recent admitted check (drives retention)
    pub last_request: SystemTime,
}

impl RateLimitRecord {
    /// The record for a key's first check, or for a fresh window.
    pub fn first(now: SystemTime) -> Self {
        RateLimitRecord {
            count: 1,
            window_start: now,
            last_request: now,
        }
    }

    /// The record after admitting one more request in the same window.
    pub(crate) fn admitted(&self, now: SystemTime) -> Self {
        RateLimitRecord {
            count: self.count + 1,
            window_start: self.window_start,
            last_request: now,
        }
    }
}

/// Store trait for admission-control record storage
///
/// Writes are conditional: `insert_if_absent` loses to an existing record
/// and `compare_and_swap` loses to any record that no longer matches the
/// snapshot the caller read. A lost write means another transaction
/// committed first — the engine re-reads and retries.
pub trait Store {
    /// Read the record for `key`
    fn get(&self, key: &str) -> Result<Option<RateLimitRecord>, String>;

    /// Insert `record` only if `key` has no record yet
    fn insert_if_absent(&mut self, key: &str, record: RateLimitRecord) -> Result<bool, String>;

    /// Replace the record for `key` only if it still equals `current`
    fn compare_and_swap(
        &mut self,
        key: &str,
        current: &RateLimitRecord,
        next: RateLimitRecord,
    ) -> Result<bool, String>;

    /// Delete up to `limit` records with `last_request` strictly before
    /// `cutoff`, returning how many were deleted
    fn remove_older_than(&mut self, cutoff: SystemTime, limit: usize) -> Result<usize, String>;
}
