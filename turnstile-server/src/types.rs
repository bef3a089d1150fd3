//! Wire types for the HTTP surface
//!
//! Instants cross the wire as unix milliseconds; inside the process they
//! are `SystemTime`. The conversions live here so the handlers never do
//! epoch arithmetic themselves.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use turnstile::{Decision, RateLimitRecord};

/// Admission check request
///
/// `key` is an opaque, already-validated identifier — the server does not
/// inspect its shape. `timestamp_ms` pins the check to a caller-chosen
/// instant (useful for deterministic testing) and defaults to the server
/// clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    /// The key to rate limit (e.g., "session:123", "ip:192.168.1.1")
    pub key: String,
    /// Unix timestamp in milliseconds (optional, defaults to current time)
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
}

/// Admission check response
///
/// When `allowed` is false, `retry_after_secs` is the whole number of
/// seconds (rounded up) until the window resets; it is 0 on admitted
/// checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests still admittable in the current window
    pub remaining: u32,
    /// Instant the current window resets, unix milliseconds
    pub reset_at_ms: i64,
    /// Seconds to wait before retrying (0 if allowed)
    pub retry_after_secs: u64,
}

impl CheckResponse {
    pub fn from_decision(decision: &Decision, now: SystemTime) -> Self {
        let retry_after_secs = if decision.allowed {
            0
        } else {
            // Round up: a denied caller must wait out the full remainder
            decision.retry_after(now).as_millis().div_ceil(1_000) as u64
        };

        CheckResponse {
            allowed: decision.allowed,
            remaining: decision.remaining,
            reset_at_ms: unix_ms(decision.reset_at),
            retry_after_secs,
        }
    }
}

/// Raw per-key record, for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub count: u32,
    pub window_start_ms: i64,
    pub last_request_ms: i64,
}

impl From<RateLimitRecord> for StatsResponse {
    fn from(record: RateLimitRecord) -> Self {
        StatsResponse {
            count: record.count,
            window_start_ms: unix_ms(record.window_start),
            last_request_ms: unix_ms(record.last_request),
        }
    }
}

/// Result of a retention sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub deleted: usize,
}

pub fn unix_ms(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_millis() as i64,
        Err(before) => -(before.duration().as_millis() as i64),
    }
}

pub fn from_unix_ms(ms: i64) -> SystemTime {
    if ms >= 0 {
        UNIX_EPOCH + Duration::from_millis(ms as u64)
    } else {
        UNIX_EPOCH - Duration::from_millis(ms.unsigned_abs())
    }
}
