//! Background maintenance jobs
//!
//! The engine never schedules its own maintenance: the retention sweep and
//! cache eviction run here as explicitly spawned tasks with a stoppable
//! handle. Both go through the actor mailbox like any other caller, so
//! they contend with live checks only the ordinary way.

use crate::actor::LimiterHandle;
use crate::metrics::Metrics;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running background job
pub struct JobHandle {
    task: JoinHandle<()>,
}

impl JobHandle {
    /// Stop the job; in-flight work finishes at the actor, no further
    /// iterations run
    pub fn stop(&self) {
        self.task.abort();
    }
}

/// Spawn the periodic retention sweep
///
/// Every `interval`, deletes records whose last check is older than the
/// engine's retention horizon (batch-limited per iteration).
pub fn spawn_retention_sweeper(
    limiter: LimiterHandle,
    metrics: Arc<Metrics>,
    interval: Duration,
) -> JobHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first sweep
        // runs one full interval after startup
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match limiter.cleanup(SystemTime::now()).await {
                Ok(deleted) => {
                    metrics.record_swept(deleted);
                    if deleted > 0 {
                        tracing::info!(deleted, "retention sweep deleted stale records");
                    }
                }
                Err(e) => tracing::warn!("retention sweep failed: {e}"),
            }
        }
    });

    JobHandle { task }
}

/// Spawn the periodic decision-cache eviction
pub fn spawn_cache_eviction(
    limiter: LimiterHandle,
    metrics: Arc<Metrics>,
    interval: Duration,
) -> JobHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match limiter.evict_cache(SystemTime::now()).await {
                Ok(evicted) => {
                    metrics.record_cache_evictions(evicted);
                    if evicted > 0 {
                        tracing::debug!(evicted, "evicted expired cache snapshots");
                    }
                }
                Err(e) => tracing::warn!("cache eviction failed: {e}"),
            }
        }
    });

    JobHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::LimiterActor;
    use turnstile::{MemoryStore, RateLimiter};

    #[tokio::test(start_paused = true)]
    async fn sweeper_job_deletes_stale_records() {
        let limiter = LimiterActor::spawn(64, RateLimiter::new(MemoryStore::new()));
        let metrics = Arc::new(Metrics::new());

        // A record whose last check is decades past the retention horizon
        let ancient = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        limiter.check("stale".to_string(), ancient).await.unwrap();
        assert!(limiter.stats("stale".to_string()).await.unwrap().is_some());

        let job = spawn_retention_sweeper(limiter.clone(), metrics.clone(), Duration::from_millis(50));

        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if limiter.stats("stale".to_string()).await.unwrap().is_none() {
                job.stop();
                assert!(metrics.records_swept.load(std::sync::atomic::Ordering::Relaxed) >= 1);
                return;
            }
        }

        panic!("sweeper never removed the stale record");
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_job_runs_no_more_sweeps() {
        let limiter = LimiterActor::spawn(64, RateLimiter::new(MemoryStore::new()));
        let metrics = Arc::new(Metrics::new());

        let job = spawn_retention_sweeper(limiter.clone(), metrics, Duration::from_millis(50));
        job.stop();

        // The stale record survives because no sweep runs after stop
        let ancient = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        limiter.check("stale".to_string(), ancient).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(limiter.stats("stale".to_string()).await.unwrap().is_some());
    }
}
