//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Engine internals:
//!     → tracing events (structured, filtered via RUST_LOG)
//!
//! Caller-registered loggers:
//!     dispatch diagnostics → logging.rs fan-out → each callback in order
//! ```
//!
//! # Design Decisions
//! - Two channels on purpose: `tracing` for operators, the `LogSink`
//!   callbacks for embedding applications
//! - Logger callbacks are invoked inline on the dispatch task; slow
//!   callbacks slow only their own request

pub mod logging;

pub use logging::{LogSink, LoggerFn};
