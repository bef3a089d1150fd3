//! # Turnstile
//!
//! A fixed-window admission-control (rate-limiting) engine for Rust.
//!
//! ## Overview
//!
//! Turnstile counts requests per identity key in fixed windows and answers
//! one question: may this request proceed? It is built for deployments where
//! many stateless processes check the same keys concurrently, so the
//! counting happens inside a transactional record store rather than behind
//! an in-process lock:
//!
//! - **Accurate accounting**: check-and-increment runs as an optimistic
//!   transaction with conflict retry — no lost updates
//! - **Pluggable storage**: any backend that can do get / insert-if-absent /
//!   compare-and-swap satisfies the [`Store`] seam
//! - **Optional decision cache**: a short-TTL snapshot tier that trades
//!   strict accuracy for latency, disabled by default
//! - **Bounded storage**: a retention sweeper deletes records that have not
//!   been touched within the retention horizon
//!
//! ## Quick Start
//!
//! ```
//! use std::time::SystemTime;
//! use turnstile::{MemoryStore, RateLimiter};
//!
//! // 20 requests per 60 second window (the defaults)
//! let mut limiter = RateLimiter::new(MemoryStore::new());
//!
//! let decision = limiter.check_rate_limit("session:123", SystemTime::now()).unwrap();
//! assert!(decision.allowed);
//! assert_eq!(decision.remaining, 19);
//! ```
//!
//! ## Configuring the window
//!
//! ```
//! use std::time::{Duration, SystemTime};
//! use turnstile::{MemoryStore, RateLimiterBuilder};
//!
//! let mut limiter = RateLimiterBuilder::new()
//!     .window(Duration::from_secs(1))
//!     .max_requests(3)
//!     .build(MemoryStore::new())
//!     .unwrap();
//!
//! let now = SystemTime::now();
//! for _ in 0..3 {
//!     assert!(limiter.check_rate_limit("chat:alice", now).unwrap().allowed);
//! }
//! // Fourth check in the same window is denied without touching the record.
//! let denied = limiter.check_rate_limit("chat:alice", now).unwrap();
//! assert!(!denied.allowed);
//! assert_eq!(denied.remaining, 0);
//! ```
//!
//! ## Decision caching
//!
//! Repeated checks for the same key can be served from a short-TTL cache
//! instead of the store. A cached decision may be stale relative to other
//! writers, so this is strictly a latency optimization — the default wiring
//! is [`NoCache`], which always consults the store:
//!
//! ```
//! use std::time::{Duration, SystemTime};
//! use turnstile::{MemoryStore, RateLimiterBuilder, TtlCache};
//!
//! let mut limiter = RateLimiterBuilder::new()
//!     .cache(TtlCache::new(Duration::from_secs(10)))
//!     .build(MemoryStore::new())
//!     .unwrap();
//!
//! let decision = limiter.check_rate_limit("upload:42", SystemTime::now()).unwrap();
//! assert!(decision.allowed);
//! ```
//!
//! ## Storage hygiene
//!
//! Records whose last check is older than the retention horizon (default
//! two hours) are deleted in batches by [`RateLimiter::cleanup_expired`],
//! intended to be driven from an external schedule:
//!
//! ```
//! use std::time::SystemTime;
//! use turnstile::{MemoryStore, RateLimiter};
//!
//! let mut limiter = RateLimiter::new(MemoryStore::new());
//! let deleted = limiter.cleanup_expired(SystemTime::now()).unwrap();
//! assert_eq!(deleted, 0);
//! ```
//!
//! ## Thread Safety
//!
//! The limiter itself is not thread-safe; within one process give it a
//! single owner (an actor task or a mutex). Cross-process coordination is
//! the store backend's job — the [`Store`] contract is what keeps
//! concurrent checks on the same key from over-admitting.
//!
//! ## Features
//!
//! - `ahash` (default): use AHash for faster hashing

pub mod core;

pub use core::{
    Decision, LimitError, LimiterConfig, MemoryStore, MemoryStoreBuilder, NoCache, RateLimitRecord,
    RateLimiter, RateLimiterBuilder, RetentionSweeper, Store, TtlCache, cache::DecisionCache,
};

// Re-export the window policy for callers that need the raw arithmetic
pub use crate::core::window;
