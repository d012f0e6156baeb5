//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Builder validates config → Server::start binds prefixes → loop spawned
//!
//! Shutdown:
//!     Server::stop (or external trigger)
//!     → shutdown.rs signal observed by acceptance loop
//!     → connection source stops accepting
//! ```
//!
//! # Design Decisions
//! - One trigger, many observers: the signal is a clonable handle
//! - Stop is best-effort: in-flight dispatches are not awaited

pub mod shutdown;

pub use shutdown::Shutdown;
