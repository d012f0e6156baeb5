//! The connection source seam consumed by the acceptance loop.
//!
//! # Responsibilities
//! - Define the interface the core needs from whatever accepts requests
//! - Keep the acceptance loop testable without sockets
//!
//! # Design Decisions
//! - `accept_next` resolves to `None` once the source has stopped and
//!   drained, so the loop can retire consumed slots without polling
//! - `stop_accepting` is made idempotent through `is_accepting`

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Prefix;
use crate::http::RequestExchange;

/// Failed to bind a configured prefix (address in use, permission denied).
/// Propagated to the caller of `start`; never retried.
#[derive(Debug, Error)]
#[error("failed to bind {prefix}: {source}")]
pub struct BindError {
    pub prefix: String,
    #[source]
    pub source: std::io::Error,
}

/// Source of inbound request exchanges.
///
/// The production implementation is [`HttpSource`](crate::net::HttpSource);
/// tests substitute in-memory sources.
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    /// Bind every prefix, or fail with the first underlying error.
    async fn bind(&self, prefixes: &[Prefix]) -> Result<(), BindError>;

    /// Await the next accepted request exchange.
    ///
    /// Returns `None` once the source has stopped accepting and all pending
    /// exchanges have been drained. Independently awaitable: any number of
    /// `accept_next` calls may be pending at once, each resolving with a
    /// distinct exchange.
    async fn accept_next(&self) -> Option<RequestExchange>;

    /// Stop accepting new connections. Idempotent via [`is_accepting`](Self::is_accepting).
    fn stop_accepting(&self);

    /// Whether the source is currently accepting connections.
    fn is_accepting(&self) -> bool;
}
