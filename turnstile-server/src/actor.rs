use anyhow::Result;
use std::time::SystemTime;
use tokio::sync::{mpsc, oneshot};
use turnstile::{Decision, DecisionCache, LimitError, RateLimitRecord, RateLimiter, Store};

/// Message types for the rate limiter actor
///
/// Every message carries the caller's clock reading, so tests (and clients
/// replaying traffic) can drive the limiter at explicit instants.
pub enum LimiterMessage {
    Check {
        key: String,
        now: SystemTime,
        response_tx: oneshot::Sender<Result<Decision, LimitError>>,
    },
    Stats {
        key: String,
        response_tx: oneshot::Sender<Result<Option<RateLimitRecord>, LimitError>>,
    },
    Cleanup {
        now: SystemTime,
        response_tx: oneshot::Sender<Result<usize, LimitError>>,
    },
    EvictCache {
        now: SystemTime,
        response_tx: oneshot::Sender<usize>,
    },
}

/// Handle to communicate with the rate limiter actor
#[derive(Clone)]
pub struct LimiterHandle {
    tx: mpsc::Sender<LimiterMessage>,
}

impl LimiterHandle {
    /// Check whether a request for `key` is admitted at instant `now`
    pub async fn check(&self, key: String, now: SystemTime) -> Result<Decision> {
        let (response_tx, response_rx) = oneshot::channel();

        self.tx
            .send(LimiterMessage::Check {
                key,
                now,
                response_tx,
            })
            .await
            .map_err(|_| anyhow::anyhow!("rate limiter actor has shut down"))?;

        let decision = response_rx
            .await
            .map_err(|_| anyhow::anyhow!("rate limiter actor dropped response channel"))??;
        Ok(decision)
    }

    /// Read the raw record for `key` (diagnostics, non-mutating)
    pub async fn stats(&self, key: String) -> Result<Option<RateLimitRecord>> {
        let (response_tx, response_rx) = oneshot::channel();

        self.tx
            .send(LimiterMessage::Stats { key, response_tx })
            .await
            .map_err(|_| anyhow::anyhow!("rate limiter actor has shut down"))?;

        let record = response_rx
            .await
            .map_err(|_| anyhow::anyhow!("rate limiter actor dropped response channel"))??;
        Ok(record)
    }

    /// Delete records past the retention horizon, returning the count
    pub async fn cleanup(&self, now: SystemTime) -> Result<usize> {
        let (response_tx, response_rx) = oneshot::channel();

        self.tx
            .send(LimiterMessage::Cleanup { now, response_tx })
            .await
            .map_err(|_| anyhow::anyhow!("rate limiter actor has shut down"))?;

        let deleted = response_rx
            .await
            .map_err(|_| anyhow::anyhow!("rate limiter actor dropped response channel"))??;
        Ok(deleted)
    }

    /// Drop expired decision-cache snapshots, returning the count
    pub async fn evict_cache(&self, now: SystemTime) -> Result<usize> {
        let (response_tx, response_rx) = oneshot::channel();

        self.tx
            .send(LimiterMessage::EvictCache { now, response_tx })
            .await
            .map_err(|_| anyhow::anyhow!("rate limiter actor has shut down"))?;

        let evicted = response_rx
            .await
            .map_err(|_| anyhow::anyhow!("rate limiter actor dropped response channel"))?;
        Ok(evicted)
    }
}

/// The rate limiter actor
///
/// Owns the limiter (and through it the record store and cache tier) on a
/// dedicated task; all access is serialized through the mailbox, so the
/// store needs no further synchronization within this process.
pub struct LimiterActor;

impl LimiterActor {
    /// Spawn the actor around a configured limiter
    pub fn spawn<S, C>(buffer_size: usize, limiter: RateLimiter<S, C>) -> LimiterHandle
    where
        S: Store + Send + 'static,
        C: DecisionCache + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(buffer_size);

        tokio::spawn(async move {
            run_actor(rx, limiter).await;
        });

        LimiterHandle { tx }
    }
}

async fn run_actor<S, C>(mut rx: mpsc::Receiver<LimiterMessage>, mut limiter: RateLimiter<S, C>)
where
    S: Store,
    C: DecisionCache,
{
    while let Some(msg) = rx.recv().await {
        match msg {
            LimiterMessage::Check {
                key,
                now,
                response_tx,
            } => {
                // Ignore send errors - receiver may have timed out
                let _ = response_tx.send(limiter.check_rate_limit(&key, now));
            }
            LimiterMessage::Stats { key, response_tx } => {
                let _ = response_tx.send(limiter.stats(&key));
            }
            LimiterMessage::Cleanup { now, response_tx } => {
                let _ = response_tx.send(limiter.cleanup_expired(now));
            }
            LimiterMessage::EvictCache { now, response_tx } => {
                let _ = response_tx.send(limiter.evict_cache(now));
            }
        }
    }

    tracing::info!("rate limiter actor shutting down");
}
