//! HTTP-facing types shared by the engine and route handlers.
//!
//! # Data Flow
//! ```text
//! hyper request (net layer)
//!     → exchange.rs (request view + buffered response sink)
//!     → dispatch / route handler writes status, headers, body
//!     → close() delivers the response back to the connection task
//! ```

pub mod exchange;
pub mod mime;

pub use exchange::RequestExchange;
