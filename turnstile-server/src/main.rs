use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use turnstile_server::config::Config;
use turnstile_server::metrics::Metrics;
use turnstile_server::transport::{Transport, http::HttpTransport};
use turnstile_server::{jobs, store};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration from environment variables and CLI arguments
    let config = Config::from_env_and_args()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("turnstile={}", config.log_level).parse()?)
                .add_directive(format!("turnstile_server={}", config.log_level).parse()?),
        )
        .init();

    let metrics = Arc::new(Metrics::new());

    // Create the rate limiter actor with the configured engine
    let limiter = store::create_limiter(&config)?;

    // Background maintenance: cache eviction and retention sweeping.
    // Handles are held for the life of the process.
    let mut job_handles = Vec::new();
    if let Some(cache) = &config.cache {
        job_handles.push(jobs::spawn_cache_eviction(
            limiter.clone(),
            metrics.clone(),
            Duration::from_millis(cache.eviction_interval_ms),
        ));
        tracing::info!(
            "decision cache enabled: ttl {}ms, eviction every {}ms",
            cache.ttl_ms,
            cache.eviction_interval_ms
        );
    }
    if config.retention.sweep_interval_ms > 0 {
        job_handles.push(jobs::spawn_retention_sweeper(
            limiter.clone(),
            metrics.clone(),
            Duration::from_millis(config.retention.sweep_interval_ms),
        ));
    }

    tracing::info!(
        "turnstile server starting: {} requests per {}ms window, retention {}ms",
        config.limiter.max_requests,
        config.limiter.window_ms,
        config.retention.retention_ms
    );

    let transport = HttpTransport::new(
        &config.http.host,
        config.http.port,
        metrics,
        config.failure_policy,
        Duration::from_millis(config.limiter.window_ms),
    );
    transport.start(limiter).await
}
