//! Route storage and lookup.
//!
//! # Responsibilities
//! - Store registered routes keyed by (method, path)
//! - Reject duplicate registrations at configuration time
//! - Look up the entry for a request, or report an explicit no-match
//!
//! # Design Decisions
//! - Immutable after build (shared via Arc, no locks at dispatch time)
//! - Exact matching only: no wildcards, no trailing-slash normalization
//! - Method is upper-cased before comparison; path is case-sensitive
//! - Keys are unique, so a plain HashMap lookup suffices

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::http::exchange::RequestExchange;

/// The only method the current contract routes on. Kept in the key rather
/// than assumed, so adding methods later is a registration change only.
pub const GET: &str = "GET";

/// A dynamic route handler. Owns completion of the response.
pub type RouteHandler = Arc<dyn Fn(RequestExchange) -> BoxFuture<'static, ()> + Send + Sync>;

/// Attempt to register two routes under the same (method, path) key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("route {method} {path} has already been registered")]
pub struct RouteCollision {
    pub method: String,
    pub path: String,
}

/// Identifies a registered route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    method: String,
    path: String,
}

impl RouteKey {
    /// Build a key, normalizing the method to upper case.
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            path: path.to_string(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// The registered behavior for a route.
#[derive(Clone)]
pub enum RouteEntry {
    /// Opaque handler invoked with the live exchange; it owns the response.
    Dynamic(RouteHandler),
    /// Precomputed payload; the engine writes the response itself.
    Static { body: Bytes, mime: String },
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteEntry::Dynamic(_) => f.write_str("Dynamic(..)"),
            RouteEntry::Static { body, mime } => f
                .debug_struct("Static")
                .field("len", &body.len())
                .field("mime", mime)
                .finish(),
        }
    }
}

/// Mapping from (method, path) to registered behavior.
///
/// Built once during configuration, then frozen for the server's lifetime.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<RouteKey, RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry. Fails if the key is already taken; existing
    /// registrations are never overwritten.
    pub fn register(&mut self, method: &str, path: &str, entry: RouteEntry) -> Result<(), RouteCollision> {
        match self.routes.entry(RouteKey::new(method, path)) {
            Entry::Occupied(occupied) => Err(RouteCollision {
                method: occupied.key().method.clone(),
                path: occupied.key().path.clone(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(())
            }
        }
    }

    /// Exact-match lookup for a request's method and path.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&RouteEntry> {
        self.routes.get(&RouteKey::new(method, path))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
