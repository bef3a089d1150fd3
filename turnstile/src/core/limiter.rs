//! Fixed-window check-and-increment engine and caller-facing facade
//!
//! This module provides the main [`RateLimiter`] struct. The engine runs
//! the per-key counting transaction against a [`Store`] backend using
//! optimistic concurrency: read the record, decide, and commit with a
//! conditional write that fails if another caller got there first. Lost
//! conflicts are retried a bounded number of times, so concurrent checks on
//! the same key can never over-admit.

use super::cache::{DecisionCache, NoCache};
use super::store::{RateLimitRecord, Store};
use super::sweeper::RetentionSweeper;
use super::{LimitError, window};
use std::time::{Duration, SystemTime};

// Configuration defaults
const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);
const DEFAULT_MAX_REQUESTS: u32 = 20;
const DEFAULT_RETENTION: Duration = Duration::from_millis(7_200_000);
const DEFAULT_SWEEP_BATCH_LIMIT: usize = 500;

/// Conflict retries before a check gives up as unavailable
const MAX_RETRIES: u32 = 10;

/// Result of an admission check
///
/// `reset_at` is the instant the key's current window ends; it is never in
/// the past relative to the check that produced the decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests still admittable in the current window
    pub remaining: u32,
    /// Instant the current window resets
    pub reset_at: SystemTime,
}

impl Decision {
    /// Time until the window resets, zero if `reset_at` has passed.
    ///
    /// A denied caller should retry no sooner than this.
    pub fn retry_after(&self, now: SystemTime) -> Duration {
        self.reset_at.duration_since(now).unwrap_or(Duration::ZERO)
    }
}

/// Static configuration for a [`RateLimiter`]
///
/// All knobs are fixed at construction; none are per-call.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Length of the counting window
    pub window: Duration,
    /// Requests admitted per key per window
    pub max_requests: u32,
    /// Age past which an untouched record is eligible for deletion
    pub retention: Duration,
    /// Records deleted per cleanup invocation at most
    pub sweep_batch_limit: usize,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        LimiterConfig {
            window: DEFAULT_WINDOW,
            max_requests: DEFAULT_MAX_REQUESTS,
            retention: DEFAULT_RETENTION,
            sweep_batch_limit: DEFAULT_SWEEP_BATCH_LIMIT,
        }
    }
}

/// Fixed-window admission-control engine
///
/// Counts checks per identity key against a [`Store`] backend, optionally
/// shortcutting repeated checks through a [`DecisionCache`]. The default
/// cache is [`NoCache`], which always consults the store.
///
/// # Example
///
/// ```
/// use std::time::SystemTime;
/// use turnstile::{MemoryStore, RateLimiter};
///
/// let mut limiter = RateLimiter::new(MemoryStore::new());
/// let decision = limiter.check_rate_limit("user:42", SystemTime::now()).unwrap();
/// assert!(decision.allowed);
/// ```
pub struct RateLimiter<S: Store, C: DecisionCache = NoCache> {
    store: S,
    cache: C,
    config: LimiterConfig,
    sweeper: RetentionSweeper,
}

/// Builder for configuring a [`RateLimiter`]
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use turnstile::{MemoryStore, RateLimiterBuilder, TtlCache};
///
/// let limiter = RateLimiterBuilder::new()
///     .window(Duration::from_secs(60))
///     .max_requests(20)
///     .retention(Duration::from_secs(7200))
///     .cache(TtlCache::new(Duration::from_secs(10)))
///     .build(MemoryStore::new())
///     .unwrap();
/// ```
pub struct RateLimiterBuilder<C: DecisionCache = NoCache> {
    config: LimiterConfig,
    cache: C,
}

impl RateLimiterBuilder<NoCache> {
    /// Create a builder with the default configuration and no cache
    pub fn new() -> Self {
        RateLimiterBuilder {
            config: LimiterConfig::default(),
            cache: NoCache,
        }
    }
}

impl Default for RateLimiterBuilder<NoCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DecisionCache> RateLimiterBuilder<C> {
    /// Set the window length
    pub fn window(mut self, window: Duration) -> Self {
        self.config.window = window;
        self
    }

    /// Set the number of requests admitted per window
    pub fn max_requests(mut self, max_requests: u32) -> Self {
        self.config.max_requests = max_requests;
        self
    }

    /// Set the retention horizon for untouched records
    pub fn retention(mut self, retention: Duration) -> Self {
        self.config.retention = retention;
        self
    }

    /// Set the per-invocation cleanup batch limit
    pub fn sweep_batch_limit(mut self, limit: usize) -> Self {
        self.config.sweep_batch_limit = limit;
        self
    }

    /// Wire in a decision cache tier
    ///
    /// Cached decisions may be stale relative to the store; use
    /// [`NoCache`] (the default) when strict accuracy matters more than
    /// latency.
    pub fn cache<C2: DecisionCache>(self, cache: C2) -> RateLimiterBuilder<C2> {
        RateLimiterBuilder {
            config: self.config,
            cache,
        }
    }

    /// Build the limiter around `store`
    ///
    /// # Errors
    ///
    /// [`LimitError::InvalidConfig`] if the window or request ceiling is
    /// zero.
    pub fn build<S: Store>(self, store: S) -> Result<RateLimiter<S, C>, LimitError> {
        if self.config.window.is_zero() || self.config.max_requests == 0 {
            return Err(LimitError::InvalidConfig);
        }

        let sweeper = RetentionSweeper::new(self.config.retention, self.config.sweep_batch_limit);
        Ok(RateLimiter {
            store,
            cache: self.cache,
            config: self.config,
            sweeper,
        })
    }
}

impl<S: Store> RateLimiter<S, NoCache> {
    /// Create a limiter with the default configuration and no cache
    /// (20 requests per 60 second window, 2 hour retention)
    pub fn new(store: S) -> Self {
        RateLimiter {
            store,
            cache: NoCache,
            config: LimiterConfig::default(),
            sweeper: RetentionSweeper::new(DEFAULT_RETENTION, DEFAULT_SWEEP_BATCH_LIMIT),
        }
    }
}

impl<S: Store, C: DecisionCache> RateLimiter<S, C> {
    /// Check whether a request for `key` is admitted, consuming quota
    ///
    /// Consults the cache first; on a miss, runs the atomic
    /// check-and-increment against the store and snapshots the outcome
    /// into the cache.
    ///
    /// # Errors
    ///
    /// [`LimitError::StoreUnavailable`] when the store fails or the
    /// transaction keeps losing conflicts. A denied request is a normal
    /// decision, not an error.
    pub fn check_rate_limit(&mut self, key: &str, now: SystemTime) -> Result<Decision, LimitError> {
        if let Some(hit) = self.cache.get(key, now) {
            return Ok(hit);
        }

        let decision = self.check_and_increment(key, now)?;
        self.cache.put(key, decision.clone(), now);
        Ok(decision)
    }

    /// Current record for `key`, read-only (diagnostics)
    pub fn stats(&self, key: &str) -> Result<Option<RateLimitRecord>, LimitError> {
        self.store.get(key).map_err(LimitError::StoreUnavailable)
    }

    /// Delete records untouched for longer than the retention horizon
    ///
    /// Bounded by the configured batch limit; returns how many records were
    /// deleted. Safe to invoke repeatedly or concurrently with live checks —
    /// a record deleted out from under an active key is simply recreated by
    /// that key's next check.
    pub fn cleanup_expired(&mut self, now: SystemTime) -> Result<usize, LimitError> {
        self.sweeper.sweep(&mut self.store, now)
    }

    /// Drop cache snapshots older than the cache TTL
    ///
    /// Intended to run on a periodic schedule; a no-op without a cache tier.
    pub fn evict_cache(&mut self, now: SystemTime) -> usize {
        self.cache.evict_expired(now)
    }

    /// The limiter's static configuration
    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// The atomic check-and-increment transaction.
    ///
    /// Each iteration reads a snapshot, decides, and commits with a
    /// conditional write; a failed write means another caller committed
    /// first, so the loop re-reads. Denials commit nothing and return
    /// directly.
    fn check_and_increment(&mut self, key: &str, now: SystemTime) -> Result<Decision, LimitError> {
        let window = self.config.window;
        let max = self.config.max_requests;
        let mut retries = 0;

        loop {
            let snapshot = self.store.get(key).map_err(LimitError::StoreUnavailable)?;

            let committed = match snapshot {
                None => {
                    // First request for this key
                    let written = self
                        .store
                        .insert_if_absent(key, RateLimitRecord::first(now))
                        .map_err(LimitError::StoreUnavailable)?;
                    written.then(|| Decision {
                        allowed: true,
                        remaining: max - 1,
                        reset_at: window::reset_at(now, window),
                    })
                }
                Some(current) if window::is_expired(current.window_start, now, window) => {
                    // Window elapsed: reset to a fresh window
                    let written = self
                        .store
                        .compare_and_swap(key, &current, RateLimitRecord::first(now))
                        .map_err(LimitError::StoreUnavailable)?;
                    written.then(|| Decision {
                        allowed: true,
                        remaining: max - 1,
                        reset_at: window::reset_at(now, window),
                    })
                }
                Some(current) if current.count >= max => {
                    // Quota exhausted: deny without touching the record
                    return Ok(Decision {
                        allowed: false,
                        remaining: 0,
                        reset_at: window::reset_at(current.window_start, window),
                    });
                }
                Some(current) => {
                    let next = current.admitted(now);
                    let remaining = max - next.count;
                    let reset_at = window::reset_at(current.window_start, window);
                    let written = self
                        .store
                        .compare_and_swap(key, &current, next)
                        .map_err(LimitError::StoreUnavailable)?;
                    written.then(|| Decision {
                        allowed: true,
                        remaining,
                        reset_at,
                    })
                }
            };

            if let Some(decision) = committed {
                return Ok(decision);
            }

            // Another caller won the write; re-read and retry
            retries += 1;
            if retries >= MAX_RETRIES {
                return Err(LimitError::StoreUnavailable(
                    "conflict retries exhausted".into(),
                ));
            }
        }
    }
}
