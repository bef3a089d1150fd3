//! # Turnstile Server
//!
//! A standalone admission-control service wrapping the `turnstile` engine.
//!
//! ## Purpose
//!
//! Stateless application instances cannot rate-limit from process memory —
//! each instance would count alone and a caller could multiply its quota by
//! the number of instances. This server centralizes the counting: every
//! instance asks the same authority, which owns the record store and runs
//! each check as one atomic transaction.
//!
//! ## Quick Start
//!
//! ```bash
//! # 20 requests per key per minute on port 8080 (the defaults)
//! turnstile
//!
//! # Stricter window, decision cache enabled
//! turnstile --max-requests 5 --window-ms 10000 --cache
//! ```
//!
//! Configuration comes from CLI arguments or `TURNSTILE_`-prefixed
//! environment variables (CLI takes precedence).
//!
//! ## HTTP API
//!
//! - `POST /check` `{"key": "session:123"}` → `{"allowed": true,
//!   "remaining": 19, "reset_at_ms": ..., "retry_after_secs": 0}`
//! - `GET /stats/{key}` → the raw record, or `null`
//! - `POST /cleanup` → `{"deleted": N}` (retention sweep, also runs on a
//!   schedule)
//! - `GET /metrics` → Prometheus text format
//! - `GET /health` → `OK`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌──────────────┐
//! │    HTTP     │    │  Background  │
//! │  Transport  │    │     Jobs     │
//! └──────┬──────┘    └──────┬───────┘
//!        └─────────┬────────┘
//!            ┌─────▼─────┐
//!            │   Actor   │
//!            └─────┬─────┘
//!            ┌─────▼─────┐
//!            │RateLimiter│
//!            │   Store   │
//!            └───────────┘
//! ```
//!
//! A single actor task owns the limiter and its store; transports and the
//! periodic jobs (retention sweep, cache eviction) reach it through a
//! cloneable handle, so every check is serialized against the same state.
//!
//! ## Failure policy
//!
//! When the record store is unavailable the server cannot assert quota
//! compliance. What happens next is configurable via `--on-store-error`:
//! `error` (default) answers 503, `allow` fails open, `deny` fails closed.

pub mod actor;
pub mod config;
pub mod jobs;
pub mod metrics;
pub mod store;
pub mod transport;
pub mod types;

#[cfg(test)]
mod actor_tests;
