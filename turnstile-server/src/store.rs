//! Engine factory
//!
//! Builds the record store and limiter from configuration and hands them to
//! the actor. The cache choice happens here, at the edge of the process —
//! the engine never knows whether a real cache tier is wired in.

use crate::actor::{LimiterActor, LimiterHandle};
use crate::config::Config;
use anyhow::Result;
use std::time::Duration;
use turnstile::{MemoryStore, RateLimiterBuilder, TtlCache};

/// Create a rate limiter actor from the server configuration
///
/// # Errors
///
/// Returns an error if the limiter configuration is invalid (already
/// guarded by [`Config`](crate::config::Config) validation).
pub fn create_limiter(config: &Config) -> Result<LimiterHandle> {
    let store = MemoryStore::builder().capacity(config.store_capacity).build();

    let builder = RateLimiterBuilder::new()
        .window(Duration::from_millis(config.limiter.window_ms))
        .max_requests(config.limiter.max_requests)
        .retention(Duration::from_millis(config.retention.retention_ms))
        .sweep_batch_limit(config.retention.batch_limit);

    let handle = match &config.cache {
        Some(cache) => {
            let cache = TtlCache::new(Duration::from_millis(cache.ttl_ms));
            LimiterActor::spawn(config.buffer_size, builder.cache(cache).build(store)?)
        }
        None => LimiterActor::spawn(config.buffer_size, builder.build(store)?),
    };

    Ok(handle)
}
