//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of builder input before a server is constructed
//! - Check prefix syntax, concurrency bounds and route uniqueness
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation runs inside `build()`; an invalid configuration never
//!   produces a startable server

use thiserror::Error;

use crate::config::schema::Prefix;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no prefixes configured")]
    NoPrefixes,

    #[error("invalid prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("max_concurrent_requests must be positive")]
    ZeroConcurrency,

    #[error("duplicate route {method} {path}")]
    RouteCollision { method: String, path: String },
}

/// Error type for configuration building.
#[derive(Debug)]
pub enum ConfigError {
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    /// The individual validation failures.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ConfigError::Validation(errors) => errors,
        }
    }
}

/// Validate the prefix list and concurrency ceiling, collecting every
/// violation. Route uniqueness is enforced separately at registration.
pub fn validate_listen_config(
    raw_prefixes: &[String],
    max_concurrent_requests: usize,
) -> Result<Vec<Prefix>, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if raw_prefixes.is_empty() {
        errors.push(ValidationError::NoPrefixes);
    }

    let mut prefixes = Vec::with_capacity(raw_prefixes.len());
    for raw in raw_prefixes {
        match Prefix::parse(raw) {
            Ok(prefix) => prefixes.push(prefix),
            Err(error) => errors.push(error),
        }
    }

    if max_concurrent_requests == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    if errors.is_empty() {
        Ok(prefixes)
    } else {
        Err(errors)
    }
}
