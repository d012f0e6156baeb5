//! Cooperative shutdown signalling.
//!
//! # Responsibilities
//! - Carry the cancellation signal between the server lifecycle and the
//!   acceptance loop
//! - Make triggering idempotent (repeated triggers are no-ops)
//! - Let tasks both poll (`is_triggered`) and await (`triggered`) the signal
//!
//! # Design Decisions
//! - Backed by a `watch` channel: the latest value is all that matters
//! - Cancellation is cooperative; nothing is preempted by triggering

use std::sync::Arc;
use tokio::sync::watch;

/// A clonable, idempotent cancellation signal.
///
/// All clones observe the same underlying flag. The server creates one
/// internally unless an external signal is supplied at configuration time.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Create a new, untriggered signal.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// Trigger the signal. Safe to call any number of times.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the signal has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal has been triggered.
    ///
    /// Resolves immediately if it already has.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        // The sender lives at least as long as `self`; a closed channel is
        // treated the same as a trigger.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
