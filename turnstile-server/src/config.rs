//! Server configuration and CLI argument parsing
//!
//! Configuration follows the precedence order:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (TURNSTILE_ prefix)
//! 3. Default values (lowest priority)
//!
//! # Example Usage
//!
//! ```bash
//! # Using CLI arguments
//! turnstile --http-port 9090 --max-requests 5
//!
//! # Using environment variables
//! export TURNSTILE_HTTP_PORT=8080
//! export TURNSTILE_MAX_REQUESTS=100
//! turnstile
//!
//! # Mixed (CLI overrides env)
//! export TURNSTILE_HTTP_PORT=8080
//! turnstile --http-port 9090  # Uses port 9090
//! ```

use anyhow::{Result, anyhow};
use clap::Parser;

/// Main configuration structure for the server
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener configuration
    pub http: HttpConfig,
    /// Window and quota settings for the engine
    pub limiter: LimiterSettings,
    /// Decision cache settings, absent when the cache tier is disabled
    pub cache: Option<CacheSettings>,
    /// Retention sweep settings
    pub retention: RetentionSettings,
    /// What a check answers when the record store is unavailable
    pub failure_policy: FailurePolicy,
    /// Initial record store capacity (unique keys)
    pub store_capacity: usize,
    /// Channel buffer size for actor communication
    pub buffer_size: usize,
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

/// Window and quota settings
#[derive(Debug, Clone)]
pub struct LimiterSettings {
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Requests admitted per key per window
    pub max_requests: u32,
}

/// Decision cache settings
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Snapshot time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Background eviction cadence in milliseconds
    pub eviction_interval_ms: u64,
}

/// Retention sweep settings
#[derive(Debug, Clone)]
pub struct RetentionSettings {
    /// Age in milliseconds past which an untouched record is deleted
    pub retention_ms: u64,
    /// Sweep cadence in milliseconds; 0 disables the background job
    /// (the POST /cleanup endpoint still works)
    pub sweep_interval_ms: u64,
    /// Records deleted per sweep at most
    pub batch_limit: usize,
}

/// What a check answers when the record store is unavailable
///
/// The engine itself never guesses: it propagates the failure. This policy
/// decides what the HTTP edge does with it — `Error` keeps the failure
/// visible (503), `Allow` fails open (risking abuse during an outage),
/// `Deny` fails closed (risking rejection of legitimate traffic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Answer 503; the caller decides (default)
    Error,
    /// Fail open: admit the request
    Allow,
    /// Fail closed: reject the request
    Deny,
}

impl std::str::FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(FailurePolicy::Error),
            "allow" => Ok(FailurePolicy::Allow),
            "deny" => Ok(FailurePolicy::Deny),
            _ => Err(anyhow!(
                "Invalid store-error policy: {}. Valid options are: error, allow, deny",
                s
            )),
        }
    }
}

/// Command-line arguments for the server
///
/// All arguments can also be set via environment variables with the
/// TURNSTILE_ prefix. CLI arguments take precedence over environment
/// variables.
#[derive(Parser, Debug)]
#[command(
    name = "turnstile",
    about = "Fixed-window admission-control server",
    long_about = "A standalone admission-control (rate-limiting) server.\n\nEnvironment variables with TURNSTILE_ prefix are supported. CLI arguments take precedence over environment variables."
)]
pub struct Args {
    // HTTP listener
    #[arg(
        long,
        value_name = "HOST",
        help = "HTTP host",
        default_value = "127.0.0.1",
        env = "TURNSTILE_HTTP_HOST"
    )]
    pub http_host: String,
    #[arg(
        long,
        value_name = "PORT",
        help = "HTTP port",
        default_value_t = 8080,
        env = "TURNSTILE_HTTP_PORT"
    )]
    pub http_port: u16,

    // Window configuration
    #[arg(
        long,
        value_name = "MS",
        help = "Window length in milliseconds",
        default_value_t = 60_000,
        env = "TURNSTILE_WINDOW_MS"
    )]
    pub window_ms: u64,
    #[arg(
        long,
        value_name = "N",
        help = "Requests admitted per key per window",
        default_value_t = 20,
        env = "TURNSTILE_MAX_REQUESTS"
    )]
    pub max_requests: u32,

    // Decision cache
    #[arg(
        long,
        help = "Enable the decision cache tier (trades accuracy for latency)",
        env = "TURNSTILE_CACHE"
    )]
    pub cache: bool,
    #[arg(
        long,
        value_name = "MS",
        help = "Decision cache TTL in milliseconds",
        default_value_t = 10_000,
        env = "TURNSTILE_CACHE_TTL_MS"
    )]
    pub cache_ttl_ms: u64,
    #[arg(
        long,
        value_name = "MS",
        help = "Cache eviction interval in milliseconds",
        default_value_t = 30_000,
        env = "TURNSTILE_CACHE_EVICTION_INTERVAL_MS"
    )]
    pub cache_eviction_interval_ms: u64,

    // Retention
    #[arg(
        long,
        value_name = "MS",
        help = "Retention horizon for untouched records in milliseconds",
        default_value_t = 7_200_000,
        env = "TURNSTILE_RETENTION_MS"
    )]
    pub retention_ms: u64,
    #[arg(
        long,
        value_name = "MS",
        help = "Retention sweep interval in milliseconds (0 disables the background job)",
        default_value_t = 300_000,
        env = "TURNSTILE_SWEEP_INTERVAL_MS"
    )]
    pub sweep_interval_ms: u64,
    #[arg(
        long,
        value_name = "N",
        help = "Records deleted per sweep at most",
        default_value_t = 500,
        env = "TURNSTILE_SWEEP_BATCH_LIMIT"
    )]
    pub sweep_batch_limit: usize,

    // Failure policy
    #[arg(
        long,
        value_name = "POLICY",
        help = "Decision when the record store is unavailable: error, allow, deny",
        default_value = "error",
        env = "TURNSTILE_ON_STORE_ERROR"
    )]
    pub on_store_error: FailurePolicy,

    // General options
    #[arg(
        long,
        value_name = "SIZE",
        help = "Initial record store capacity",
        default_value_t = 100_000,
        env = "TURNSTILE_STORE_CAPACITY"
    )]
    pub store_capacity: usize,
    #[arg(
        long,
        value_name = "SIZE",
        help = "Channel buffer size",
        default_value_t = 100_000,
        env = "TURNSTILE_BUFFER_SIZE"
    )]
    pub buffer_size: usize,
    #[arg(
        long,
        value_name = "LEVEL",
        help = "Log level: error, warn, info, debug, trace",
        default_value = "info",
        env = "TURNSTILE_LOG_LEVEL"
    )]
    pub log_level: String,
}

impl Config {
    /// Build configuration from environment variables and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid (zero
    /// window, zero quota, zero cache TTL with the cache enabled, ...).
    pub fn from_env_and_args() -> Result<Self> {
        // Clap handles the CLI > env > default precedence
        Self::from_args(Args::parse())
    }

    /// Build configuration from already-parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let config = Config {
            http: HttpConfig {
                host: args.http_host,
                port: args.http_port,
            },
            limiter: LimiterSettings {
                window_ms: args.window_ms,
                max_requests: args.max_requests,
            },
            cache: args.cache.then_some(CacheSettings {
                ttl_ms: args.cache_ttl_ms,
                eviction_interval_ms: args.cache_eviction_interval_ms,
            }),
            retention: RetentionSettings {
                retention_ms: args.retention_ms,
                sweep_interval_ms: args.sweep_interval_ms,
                batch_limit: args.sweep_batch_limit,
            },
            failure_policy: args.on_store_error,
            store_capacity: args.store_capacity,
            buffer_size: args.buffer_size,
            log_level: args.log_level,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.limiter.window_ms == 0 {
            return Err(anyhow!("window-ms must be at least 1"));
        }
        if self.limiter.max_requests == 0 {
            return Err(anyhow!("max-requests must be at least 1"));
        }
        if self.retention.retention_ms == 0 {
            return Err(anyhow!("retention-ms must be at least 1"));
        }
        if self.retention.batch_limit == 0 {
            return Err(anyhow!("sweep-batch-limit must be at least 1"));
        }
        if self.buffer_size == 0 {
            return Err(anyhow!("buffer-size must be at least 1"));
        }
        if let Some(cache) = &self.cache {
            if cache.ttl_ms == 0 {
                return Err(anyhow!("cache-ttl-ms must be at least 1"));
            }
            if cache.eviction_interval_ms == 0 {
                return Err(anyhow!("cache-eviction-interval-ms must be at least 1"));
            }
        }

        Ok(())
    }
}
