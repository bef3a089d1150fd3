//! Simple metrics collection for observability
//!
//! Lightweight atomic counters with a Prometheus text exporter. Designed
//! for minimal overhead in the hot path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Core metrics collected by the server
pub struct Metrics {
    /// Server start time
    start_time: Instant,

    /// Total admission checks received
    pub requests_total: AtomicU64,

    /// Admission decisions
    pub requests_allowed: AtomicU64,
    pub requests_denied: AtomicU64,
    pub requests_errors: AtomicU64,

    /// Records deleted by retention sweeps
    pub records_swept: AtomicU64,

    /// Cache snapshots dropped by background eviction
    pub cache_evictions: AtomicU64,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            requests_total: AtomicU64::new(0),
            requests_allowed: AtomicU64::new(0),
            requests_denied: AtomicU64::new(0),
            requests_errors: AtomicU64::new(0),
            records_swept: AtomicU64::new(0),
            cache_evictions: AtomicU64::new(0),
        }
    }

    /// Record an admission decision
    pub fn record_decision(&self, allowed: bool) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if allowed {
            self.requests_allowed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_denied.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a check that failed against the store
    pub fn record_error(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        self.requests_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record records deleted by a retention sweep
    pub fn record_swept(&self, deleted: usize) {
        self.records_swept.fetch_add(deleted as u64, Ordering::Relaxed);
    }

    /// Record snapshots dropped by cache eviction
    pub fn record_cache_evictions(&self, evicted: usize) {
        self.cache_evictions.fetch_add(evicted as u64, Ordering::Relaxed);
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::with_capacity(1024);

        output.push_str("# HELP turnstile_uptime_seconds Time since server start in seconds\n");
        output.push_str("# TYPE turnstile_uptime_seconds gauge\n");
        output.push_str(&format!("turnstile_uptime_seconds {}\n\n", self.uptime_seconds()));

        output.push_str("# HELP turnstile_requests_total Total number of admission checks\n");
        output.push_str("# TYPE turnstile_requests_total counter\n");
        output.push_str(&format!(
            "turnstile_requests_total {}\n\n",
            self.requests_total.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP turnstile_requests_allowed Total checks admitted\n");
        output.push_str("# TYPE turnstile_requests_allowed counter\n");
        output.push_str(&format!(
            "turnstile_requests_allowed {}\n\n",
            self.requests_allowed.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP turnstile_requests_denied Total checks denied\n");
        output.push_str("# TYPE turnstile_requests_denied counter\n");
        output.push_str(&format!(
            "turnstile_requests_denied {}\n\n",
            self.requests_denied.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP turnstile_requests_errors Total checks failed against the store\n");
        output.push_str("# TYPE turnstile_requests_errors counter\n");
        output.push_str(&format!(
            "turnstile_requests_errors {}\n\n",
            self.requests_errors.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP turnstile_records_swept_total Records deleted by retention sweeps\n");
        output.push_str("# TYPE turnstile_records_swept_total counter\n");
        output.push_str(&format!(
            "turnstile_records_swept_total {}\n\n",
            self.records_swept.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP turnstile_cache_evictions_total Cache snapshots dropped by eviction\n");
        output.push_str("# TYPE turnstile_cache_evictions_total counter\n");
        output.push_str(&format!(
            "turnstile_cache_evictions_total {}\n",
            self.cache_evictions.load(Ordering::Relaxed)
        ));

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.requests_total.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.requests_allowed.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.requests_denied.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.requests_errors.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_decision() {
        let metrics = Metrics::new();

        metrics.record_decision(true);
        metrics.record_decision(true);
        metrics.record_decision(false);

        assert_eq!(metrics.requests_total.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.requests_allowed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.requests_denied.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_record_error_counts_toward_total() {
        let metrics = Metrics::new();

        metrics.record_error();

        assert_eq!(metrics.requests_total.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.requests_errors.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.requests_allowed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();

        metrics.record_decision(true);
        metrics.record_decision(false);
        metrics.record_swept(7);
        metrics.record_cache_evictions(3);

        let output = metrics.export_prometheus();

        assert!(output.contains("turnstile_uptime_seconds"));
        assert!(output.contains("turnstile_requests_total 2"));
        assert!(output.contains("turnstile_requests_allowed 1"));
        assert!(output.contains("turnstile_requests_denied 1"));
        assert!(output.contains("turnstile_records_swept_total 7"));
        assert!(output.contains("turnstile_cache_evictions_total 3"));
    }
}
