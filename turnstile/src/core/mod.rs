//! Core components of the turnstile admission-control library
//!
//! This module contains the fundamental building blocks:
//! - [`window`]: fixed-window expiry and reset arithmetic
//! - [`limiter`]: the check-and-increment engine and caller-facing facade
//! - [`store`]: the transactional record store seam and in-memory backend
//! - [`cache`]: the optional decision-snapshot tier
//! - [`sweeper`]: batch deletion of records past the retention horizon

pub mod cache;
pub mod limiter;
pub mod store;
pub mod sweeper;
pub mod window;


pub use cache::{NoCache, TtlCache};
pub use limiter::{Decision, LimiterConfig, RateLimiter, RateLimiterBuilder};
pub use store::{MemoryStore, MemoryStoreBuilder, RateLimitRecord, Store};
pub use sweeper::RetentionSweeper;

use std::error::Error;
use std::fmt;

/// Errors that can occur during admission-control operations
///
/// # Variants
///
/// - [`InvalidConfig`](LimitError::InvalidConfig): the window or request
///   ceiling was zero at build time
/// - [`StoreUnavailable`](LimitError::StoreUnavailable): the record store
///   failed, or the transaction could not be committed within the bounded
///   number of conflict retries
///
/// Transient write conflicts are retried inside the engine and never
/// surface on their own; callers only ever see `StoreUnavailable` once the
/// retries are exhausted. Whether that means fail-open or fail-closed is
/// deliberately left to the caller.
#[derive(Debug)]
pub enum LimitError {
    /// Rate limit configuration is invalid (window or max_requests is zero)
    InvalidConfig,
    /// The record store failed or the transaction could not be completed
    StoreUnavailable(String),
}

impl fmt::Display for LimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitError::InvalidConfig => write!(f, "invalid rate limit configuration"),
            LimitError::StoreUnavailable(msg) => write!(f, "record store unavailable: {msg}"),
        }
    }
}

impl Error for LimitError {}
