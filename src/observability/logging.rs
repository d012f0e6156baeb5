//! Diagnostic log fan-out.
//!
//! # Responsibilities
//! - Deliver diagnostic lines to every registered logger callback
//! - Preserve registration order
//!
//! # Design Decisions
//! - The callback list is frozen at build time; emitting from concurrent
//!   dispatches needs no locking
//! - Engine-internal events go through `tracing`; this sink exists for the
//!   caller-facing logger callbacks registered on the builder

use std::fmt;
use std::sync::Arc;

/// A registered logger callback.
pub type LoggerFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Fan-out of diagnostic lines to zero or more registered loggers.
#[derive(Clone, Default)]
pub struct LogSink {
    loggers: Arc<Vec<LoggerFn>>,
}

impl LogSink {
    /// Create a sink over the given callbacks, invoked in order.
    pub fn new(loggers: Vec<LoggerFn>) -> Self {
        Self {
            loggers: Arc::new(loggers),
        }
    }

    /// Deliver one line to every registered logger.
    pub fn emit(&self, line: &str) {
        for logger in self.loggers.iter() {
            logger(line);
        }
    }

    /// Number of registered loggers.
    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    /// Whether any loggers are registered.
    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("loggers", &self.loggers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn emits_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        let second = seen.clone();
        let sink = LogSink::new(vec![
            Arc::new(move |line: &str| first.lock().expect("lock").push(format!("a:{line}"))),
            Arc::new(move |line: &str| second.lock().expect("lock").push(format!("b:{line}"))),
        ]);

        sink.emit("hello");

        let seen = seen.lock().expect("lock");
        assert_eq!(*seen, vec!["a:hello".to_string(), "b:hello".to_string()]);
    }

    #[test]
    fn empty_sink_is_a_no_op() {
        let sink = LogSink::default();
        assert!(sink.is_empty());
        sink.emit("dropped");
    }
}
