//! Configuration value definitions.
//!
//! The server configuration is built in code through the builder and frozen
//! before the server starts; there is no file loading and no mutation after
//! `start`.

use std::fmt;

use url::Url;

use crate::config::validation::ValidationError;

/// Default ceiling on concurrently awaited requests.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 100;

/// A validated address/port binding such as `http://localhost:8080/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    raw: String,
    host: String,
    port: u16,
}

impl Prefix {
    /// Parse and validate a prefix string.
    ///
    /// Only the `http` scheme is accepted; the host and port are extracted
    /// for binding (port 80 when omitted).
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidPrefix {
            prefix: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw).map_err(|error| invalid(&error.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid("only the http scheme is supported"));
        }
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?.to_string();
        let port = url.port_or_known_default().ok_or_else(|| invalid("missing port"))?;

        Ok(Self {
            raw: raw.to_string(),
            host,
            port,
        })
    }

    /// The prefix exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Host to bind.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port to bind.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Frozen server configuration.
///
/// Routes, loggers and the shutdown signal travel alongside this in the
/// built [`Server`](crate::server::Server); this bundle covers the values
/// the acceptance machinery reads.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bindings the server listens on. Non-empty after validation.
    pub prefixes: Vec<Prefix>,

    /// Ceiling on concurrently awaited requests. Positive after validation.
    pub max_concurrent_requests: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            prefixes: Vec::new(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}
