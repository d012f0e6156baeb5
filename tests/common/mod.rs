//! Shared utilities for integration testing.

use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};

use tinyserve::ServerBuilder;

/// Pick a free localhost port by binding an ephemeral listener and
/// releasing it.
pub fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

/// A builder pre-configured with a localhost prefix on a free port.
pub fn localhost_builder() -> (ServerBuilder, u16) {
    let port = free_port();
    (ServerBuilder::new().localhost(port), port)
}

/// Attach a logger that records every emitted line.
#[allow(dead_code)]
pub fn with_recording_logger(builder: ServerBuilder) -> (ServerBuilder, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let recorded = lines.clone();
    let builder = builder.logger(move |line| {
        recorded.lock().expect("lock").push(line.to_string());
    });
    (builder, lines)
}

/// URL for a path on a localhost server.
pub fn url(port: u16, path: &str) -> String {
    format!("http://localhost:{port}{path}")
}
