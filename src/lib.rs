//! Minimal concurrent HTTP server with bounded request acceptance.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                   TINYSERVE                      │
//!                    │                                                  │
//!   Client Request   │  ┌─────────┐    ┌─────────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│   net   │───▶│ acceptance  │──▶│ routing  │  │
//!                    │  │ source  │    │    loop     │   │  table   │  │
//!                    │  └─────────┘    └──────┬──────┘   └────┬─────┘  │
//!                    │                        │               │        │
//!                    │                        ▼               ▼        │
//!   Client Response  │  ┌─────────┐    ┌─────────────────────────────┐ │
//!   ◀────────────────┼──│exchange │◀───│          dispatch           │ │
//!                    │  │  sink   │    │  (static write / handler)   │ │
//!                    │  └─────────┘    └─────────────────────────────┘ │
//!                    │                                                 │
//!                    │  ┌───────────────────────────────────────────┐  │
//!                    │  │           Cross-Cutting Concerns          │  │
//!                    │  │  ┌────────┐ ┌───────────┐ ┌────────────┐  │  │
//!                    │  │  │ config │ │ lifecycle │ │ observa-   │  │  │
//!                    │  │  │builder │ │ shutdown  │ │ bility     │  │  │
//!                    │  │  └────────┘ └───────────┘ └────────────┘  │  │
//!                    │  └───────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────────┘
//! ```
//!
//! The acceptance loop keeps a fixed number of pending accept operations
//! in flight, dispatches whichever completes first, and re-arms the
//! consumed slot immediately. Shutdown is cooperative: a shared signal is
//! checked at the top of each loop iteration and never preempts a request
//! already handed to a handler.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;
pub mod server;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigError, Prefix, ServerConfig, ValidationError};
pub use http::{mime, RequestExchange};
pub use lifecycle::Shutdown;
pub use net::{BindError, ConnectionSource, HttpSource};
pub use observability::{LogSink, LoggerFn};
pub use routing::{RouteCollision, RouteEntry, RouteHandler, RouteTable};
pub use server::{Server, ServerBuilder, ServerError, ServerState};
