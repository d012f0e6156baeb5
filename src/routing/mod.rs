//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at build time):
//!     builder calls → table.rs register (collision checked, never overwritten)
//!     → frozen RouteTable shared via Arc
//!
//! Dispatch (per request):
//!     (method, path) → table.rs lookup → Dynamic | Static | no match
//! ```
//!
//! # Design Decisions
//! - Exact matching only; the key encodes the method, nothing is assumed
//! - Deterministic: unique keys mean no ordering or priority rules

pub mod table;

pub use table::{RouteCollision, RouteEntry, RouteHandler, RouteKey, RouteTable, GET};
