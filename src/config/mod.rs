//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! builder calls (prefixes, routes, loggers, limits)
//!     → validation.rs (semantic checks, all errors reported)
//!     → ServerConfig (validated, immutable)
//!     → read by the server and acceptance loop, never mutated after start
//! ```
//!
//! # Design Decisions
//! - Configuration is built in code; no files, environment or reload
//! - An explicit immutable value passed to the server at construction,
//!   never process-wide mutable state

pub mod schema;
pub mod validation;

pub use schema::{Prefix, ServerConfig, DEFAULT_MAX_CONCURRENT_REQUESTS};
pub use validation::{ConfigError, ValidationError};
