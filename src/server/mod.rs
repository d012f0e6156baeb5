//! Server lifecycle and the accept/dispatch engine.
//!
//! # Data Flow
//! ```text
//! ServerBuilder::build (validated, frozen config)
//!     → Server::start: bind prefixes, spawn accept_loop.rs
//!     → accept_loop.rs races the in-flight set, re-arms accept slots
//!     → dispatch.rs matches routes and writes responses
//!     → Server::stop: trigger shutdown signal, stop the source
//! ```
//!
//! # Design Decisions
//! - States are `Configured → Running → Stopped`; there is no restart
//! - `start` returns once the source is listening, not when the loop ends
//! - `stop` is idempotent and best-effort: it never waits for in-flight
//!   dispatches to drain

mod accept_loop;
pub mod builder;
mod dispatch;

pub use builder::ServerBuilder;

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::lifecycle::Shutdown;
use crate::net::{BindError, ConnectionSource, HttpSource};
use crate::observability::LogSink;
use crate::routing::RouteTable;

/// Error type for lifecycle operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server has already been started")]
    AlreadyStarted,

    #[error("server has been stopped")]
    Stopped,

    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Lifecycle state of a [`Server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Configured,
    Running,
    Stopped,
}

/// A configured HTTP server.
///
/// Built by [`ServerBuilder`], started once, stopped any number of times.
/// Dropping the server stops it.
pub struct Server {
    config: ServerConfig,
    routes: Arc<RouteTable>,
    log: LogSink,
    shutdown: Shutdown,
    source: Arc<dyn ConnectionSource>,
    state: ServerState,
    loop_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Start configuring a server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub(crate) fn new(
        config: ServerConfig,
        routes: RouteTable,
        log: LogSink,
        shutdown: Shutdown,
    ) -> Self {
        let source = Arc::new(HttpSource::new(config.max_concurrent_requests));
        Self {
            config,
            routes: Arc::new(routes),
            log,
            shutdown,
            source,
            state: ServerState::Configured,
            loop_task: None,
        }
    }

    /// Bind all configured prefixes and launch the acceptance loop.
    ///
    /// Returns once the server is listening; the loop runs as background
    /// work until [`stop`](Self::stop) or the shutdown signal. Bind
    /// failures (address in use, permission denied) propagate unretried.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        match self.state {
            ServerState::Configured => {}
            ServerState::Running => return Err(ServerError::AlreadyStarted),
            ServerState::Stopped => return Err(ServerError::Stopped),
        }
        if self.shutdown.is_triggered() {
            self.state = ServerState::Stopped;
            return Err(ServerError::Stopped);
        }

        self.source.bind(&self.config.prefixes).await?;

        let task = tokio::spawn(accept_loop::run(
            self.source.clone(),
            self.routes.clone(),
            self.log.clone(),
            self.config.max_concurrent_requests,
            self.shutdown.clone(),
        ));
        self.loop_task = Some(task);
        self.state = ServerState::Running;

        tracing::info!(
            prefixes = self.config.prefixes.len(),
            max_concurrent_requests = self.config.max_concurrent_requests,
            routes = self.routes.len(),
            "Server started"
        );
        Ok(())
    }

    /// Stop the server: trigger the shutdown signal and stop accepting.
    ///
    /// Idempotent, and safe to call before or without `start`. In-flight
    /// dispatches are not awaited; they finish on their own tasks.
    pub fn stop(&self) {
        if !self.shutdown.is_triggered() {
            tracing::info!("Server stopping");
            self.shutdown.trigger();
        }
        if self.source.is_accepting() {
            self.source.stop_accepting();
        }
    }

    /// Wait for the acceptance loop to finish.
    ///
    /// Resolves once the loop has observed the shutdown signal (or the
    /// source drained); immediately if the server never started.
    pub async fn stopped(&mut self) {
        if let Some(task) = self.loop_task.take() {
            let _ = task.await;
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        if self.shutdown.is_triggered() {
            ServerState::Stopped
        } else {
            self.state
        }
    }

    /// The frozen configuration this server runs with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// A handle to this server's shutdown signal.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.stop();
    }
}
