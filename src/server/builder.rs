//! Fluent server configuration.
//!
//! # Responsibilities
//! - Collect prefixes, routes, loggers and limits
//! - Validate everything in `build()`, reporting all violations at once
//! - Freeze the configuration into a `Server` ready to start
//!
//! # Design Decisions
//! - Route collisions are caught here, before a server exists; an invalid
//!   configuration can never start listening
//! - All options have defaults except the prefixes, which are mandatory

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::BoxFuture;

use crate::config::{validation, ConfigError, ValidationError, ServerConfig, DEFAULT_MAX_CONCURRENT_REQUESTS};
use crate::http::{mime, RequestExchange};
use crate::lifecycle::Shutdown;
use crate::observability::{LogSink, LoggerFn};
use crate::routing::{RouteEntry, RouteHandler, RouteTable, GET};
use crate::server::Server;

/// Builds a [`Server`] from fluent configuration calls.
///
/// ```no_run
/// # use tinyserve::Server;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut server = Server::builder()
///     .localhost(8080)
///     .get_route_text("/", "Hello World!")
///     .build()?;
/// server.start().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    prefixes: Vec<String>,
    routes: Vec<(String, RouteEntry)>,
    loggers: Vec<LoggerFn>,
    max_concurrent_requests: Option<usize>,
    shutdown: Option<Shutdown>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an address/port binding such as `http://localhost:8080/`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Convenience for `prefix("http://localhost:{port}/")`.
    pub fn localhost(self, port: u16) -> Self {
        self.prefix(format!("http://localhost:{port}/"))
    }

    /// Convenience for [`localhost`](Self::localhost) on port 8080.
    pub fn localhost_default(self) -> Self {
        self.localhost(8080)
    }

    /// Register a dynamic GET route. The handler receives the live exchange
    /// and owns completion of the response.
    pub fn get_route<H, Fut>(mut self, path: impl Into<String>, handler: H) -> Self
    where
        H: Fn(RequestExchange) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: RouteHandler =
            Arc::new(move |exchange| -> BoxFuture<'static, ()> { Box::pin(handler(exchange)) });
        self.routes.push((path.into(), RouteEntry::Dynamic(handler)));
        self
    }

    /// Register a static GET route serving a fixed byte payload.
    pub fn get_route_bytes(
        mut self,
        path: impl Into<String>,
        body: impl Into<Bytes>,
        mime: impl Into<String>,
    ) -> Self {
        self.routes.push((
            path.into(),
            RouteEntry::Static {
                body: body.into(),
                mime: mime.into(),
            },
        ));
        self
    }

    /// Register a static GET route serving UTF-8 text as `text/plain`.
    pub fn get_route_text(self, path: impl Into<String>, text: impl Into<String>) -> Self {
        let body = Bytes::from(text.into().into_bytes());
        self.get_route_bytes(path, body, mime::DEFAULT_TEXT)
    }

    /// Register a logger callback; repeatable, invoked in registration order.
    pub fn logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.loggers.push(Arc::new(logger));
        self
    }

    /// Ceiling on concurrently awaited requests (default 100).
    pub fn max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = Some(max);
        self
    }

    /// Supply an external cancellation signal; the server otherwise owns a
    /// fresh one.
    pub fn shutdown_signal(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Validate the configuration and construct the server.
    ///
    /// Every violation is reported, not just the first. A collision or an
    /// empty prefix list never yields a startable server.
    pub fn build(self) -> Result<Server, ConfigError> {
        let max_concurrent_requests = self
            .max_concurrent_requests
            .unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS);

        let mut errors = Vec::new();
        let prefixes =
            match validation::validate_listen_config(&self.prefixes, max_concurrent_requests) {
                Ok(prefixes) => prefixes,
                Err(mut validation_errors) => {
                    errors.append(&mut validation_errors);
                    Vec::new()
                }
            };

        let mut routes = RouteTable::new();
        for (path, entry) in self.routes {
            if let Err(collision) = routes.register(GET, &path, entry) {
                errors.push(ValidationError::RouteCollision {
                    method: collision.method,
                    path: collision.path,
                });
            }
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        let config = ServerConfig {
            prefixes,
            max_concurrent_requests,
        };
        Ok(Server::new(
            config,
            routes,
            LogSink::new(self.loggers),
            self.shutdown.unwrap_or_default(),
        ))
    }
}
