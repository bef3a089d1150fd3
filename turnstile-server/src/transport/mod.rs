//! Transport layer for the admission-control server
//!
//! A transport accepts client connections, parses protocol-specific
//! requests, forwards them to the rate limiter actor, and sends responses
//! back. The HTTP/JSON transport is the only one currently implemented.

pub mod http;

#[cfg(test)]
mod http_test;

use crate::actor::LimiterHandle;
use anyhow::Result;
use async_trait::async_trait;

/// Common interface for transport implementations
#[async_trait]
pub trait Transport {
    /// Start the transport server
    ///
    /// Binds to the configured address and serves requests against the
    /// provided limiter handle. Runs indefinitely until an error occurs or
    /// the server shuts down.
    async fn start(self, limiter: LimiterHandle) -> Result<()>;
}
