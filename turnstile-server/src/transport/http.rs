//! HTTP/JSON transport
//!
//! # API Endpoints
//!
//! ## POST /check
//!
//! Check and consume quota for a key.
//!
//! ```json
//! {"key": "session:123", "timestamp_ms": 1234567890123}
//! ```
//!
//! `timestamp_ms` is optional and defaults to the server clock. Response:
//!
//! ```json
//! {"allowed": true, "remaining": 19, "reset_at_ms": 1234567950123, "retry_after_secs": 0}
//! ```
//!
//! A denied check is an ordinary 200 response with `allowed: false`;
//! mapping it to 429 (with `retry_after_secs` as the Retry-After value) is
//! the consuming application's concern. A check that cannot reach the
//! record store is answered per the configured failure policy.
//!
//! ## GET /stats/{key}
//!
//! The raw record for a key, or JSON `null`. Read-only.
//!
//! ## POST /cleanup
//!
//! Run one retention sweep, returning `{"deleted": N}`.
//!
//! ## GET /metrics
//!
//! Prometheus text format.
//!
//! ## GET /health
//!
//! Health check endpoint. Returns "OK" with 200 status.

use super::Transport;
use crate::actor::LimiterHandle;
use crate::config::FailurePolicy;
use crate::metrics::Metrics;
use crate::types::{CheckRequest, CheckResponse, CleanupResponse, StatsResponse, from_unix_ms, unix_ms};
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error message
    pub error: String,
}

/// Shared handler state
pub struct AppState {
    pub limiter: LimiterHandle,
    pub metrics: Arc<Metrics>,
    pub failure_policy: FailurePolicy,
    /// Window length, used to synthesize fail-open/fail-closed responses
    pub window: Duration,
}

/// HTTP transport implementation
pub struct HttpTransport {
    addr: SocketAddr,
    metrics: Arc<Metrics>,
    failure_policy: FailurePolicy,
    window: Duration,
}

impl HttpTransport {
    pub fn new(
        host: &str,
        port: u16,
        metrics: Arc<Metrics>,
        failure_policy: FailurePolicy,
        window: Duration,
    ) -> Self {
        let addr = format!("{host}:{port}").parse().expect("Invalid address");
        Self {
            addr,
            metrics,
            failure_policy,
            window,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn start(self, limiter: LimiterHandle) -> Result<()> {
        let state = Arc::new(AppState {
            limiter,
            metrics: self.metrics,
            failure_policy: self.failure_policy,
            window: self.window,
        });

        let app = router(state);

        tracing::info!("HTTP server listening on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the router; separated from [`Transport::start`] so tests can
/// serve it on an ephemeral listener
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/check", post(handle_check))
        .route("/stats/{key}", get(handle_stats))
        .route("/cleanup", post(handle_cleanup))
        .route("/metrics", get(handle_metrics))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

async fn handle_check(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, (StatusCode, Json<HttpErrorResponse>)> {
    let now = match req.timestamp_ms {
        Some(ms) => from_unix_ms(ms),
        None => SystemTime::now(),
    };

    match state.limiter.check(req.key, now).await {
        Ok(decision) => {
            state.metrics.record_decision(decision.allowed);
            Ok(Json(CheckResponse::from_decision(&decision, now)))
        }
        Err(e) => {
            state.metrics.record_error();
            match state.failure_policy {
                FailurePolicy::Error => {
                    tracing::error!("admission check failed: {e}");
                    Err((
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(HttpErrorResponse {
                            error: format!("store unavailable: {e}"),
                        }),
                    ))
                }
                FailurePolicy::Allow => {
                    tracing::warn!("admission check failed, failing open: {e}");
                    Ok(Json(CheckResponse {
                        allowed: true,
                        remaining: 0,
                        reset_at_ms: unix_ms(now + state.window),
                        retry_after_secs: 0,
                    }))
                }
                FailurePolicy::Deny => {
                    tracing::warn!("admission check failed, failing closed: {e}");
                    Ok(Json(CheckResponse {
                        allowed: false,
                        remaining: 0,
                        reset_at_ms: unix_ms(now + state.window),
                        retry_after_secs: state.window.as_millis().div_ceil(1_000) as u64,
                    }))
                }
            }
        }
    }
}

async fn handle_stats(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<Option<StatsResponse>>, (StatusCode, Json<HttpErrorResponse>)> {
    match state.limiter.stats(key).await {
        Ok(record) => Ok(Json(record.map(StatsResponse::from))),
        Err(e) => {
            tracing::error!("stats lookup failed: {e}");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HttpErrorResponse {
                    error: format!("store unavailable: {e}"),
                }),
            ))
        }
    }
}

async fn handle_cleanup(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CleanupResponse>, (StatusCode, Json<HttpErrorResponse>)> {
    match state.limiter.cleanup(SystemTime::now()).await {
        Ok(deleted) => {
            state.metrics.record_swept(deleted);
            if deleted > 0 {
                tracing::info!(deleted, "retention sweep deleted stale records");
            }
            Ok(Json(CleanupResponse { deleted }))
        }
        Err(e) => {
            tracing::error!("retention sweep failed: {e}");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HttpErrorResponse {
                    error: format!("store unavailable: {e}"),
                }),
            ))
        }
    }
}

async fn handle_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.export_prometheus()
}
