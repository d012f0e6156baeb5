//! Network subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → listener.rs accept task (one per prefix)
//!     → hyper HTTP/1.1 connection serving
//!     → RequestExchange queued for the acceptance loop
//!     → response oneshot completed by dispatch / handler
//!     → hyper writes the response to the socket
//! ```
//!
//! # Design Decisions
//! - The core consumes the `ConnectionSource` trait only; sockets and
//!   hyper are an implementation detail of `HttpSource`

pub mod listener;
pub mod source;

pub use listener::HttpSource;
pub use source::{BindError, ConnectionSource};
