//! Production connection source over TCP and hyper HTTP/1.1.
//!
//! # Responsibilities
//! - Bind one TCP listener per configured prefix
//! - Serve each connection with hyper, turning requests into exchanges
//! - Feed accepted exchanges to the acceptance loop via `accept_next`
//! - Release bound addresses promptly on `stop_accepting`
//!
//! # Design Decisions
//! - One spawned accept task per listener; aborting it drops the listener
//!   and frees the address immediately
//! - Exchanges flow through a bounded channel sized to the concurrency
//!   ceiling, so connection tasks back off when the loop is saturated
//! - The response travels back over the exchange's oneshot; a dropped
//!   exchange (handler panic or bug) turns into a bare 500

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use async_trait::async_trait;

use crate::config::Prefix;
use crate::http::exchange::RequestExchange;
use crate::net::source::{BindError, ConnectionSource};

/// HTTP/1.1 connection source backed by `tokio::net::TcpListener`.
pub struct HttpSource {
    exchanges_tx: Mutex<Option<mpsc::Sender<RequestExchange>>>,
    exchanges_rx: tokio::sync::Mutex<mpsc::Receiver<RequestExchange>>,
    accept_tasks: Mutex<Vec<JoinHandle<()>>>,
    accepting: AtomicBool,
}

impl HttpSource {
    /// Create an unbound source whose pending-exchange queue holds at most
    /// `queue_depth` requests.
    pub fn new(queue_depth: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        Self {
            exchanges_tx: Mutex::new(Some(tx)),
            exchanges_rx: tokio::sync::Mutex::new(rx),
            accept_tasks: Mutex::new(Vec::new()),
            accepting: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ConnectionSource for HttpSource {
    async fn bind(&self, prefixes: &[Prefix]) -> Result<(), BindError> {
        let tx = match self.exchanges_tx.lock().expect("lock poisoned").clone() {
            Some(tx) => tx,
            // Already stopped; nothing to bind to.
            None => return Ok(()),
        };

        // Bind everything before accepting anything, so a failure on the
        // second prefix releases the first.
        let mut listeners = Vec::with_capacity(prefixes.len());
        for prefix in prefixes {
            let listener = TcpListener::bind((prefix.host(), prefix.port()))
                .await
                .map_err(|source| BindError {
                    prefix: prefix.to_string(),
                    source,
                })?;
            match listener.local_addr() {
                Ok(addr) => tracing::info!(prefix = %prefix, address = %addr, "Listener bound"),
                Err(_) => tracing::info!(prefix = %prefix, "Listener bound"),
            }
            listeners.push(listener);
        }

        let mut tasks = self.accept_tasks.lock().expect("lock poisoned");
        for listener in listeners {
            let tx = tx.clone();
            tasks.push(tokio::spawn(accept_connections(listener, tx)));
        }
        self.accepting.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn accept_next(&self) -> Option<RequestExchange> {
        self.exchanges_rx.lock().await.recv().await
    }

    fn stop_accepting(&self) {
        if !self.accepting.swap(false, Ordering::SeqCst) {
            return;
        }
        for task in self.accept_tasks.lock().expect("lock poisoned").drain(..) {
            task.abort();
        }
        // Dropping our sender lets `accept_next` drain to None once the
        // remaining connection tasks finish.
        self.exchanges_tx.lock().expect("lock poisoned").take();
        tracing::info!("Stopped accepting connections");
    }

    fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }
}

/// Accept TCP connections on one listener until the task is aborted.
async fn accept_connections(listener: TcpListener, tx: mpsc::Sender<RequestExchange>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(error) = serve_connection(stream, tx).await {
                        tracing::debug!(peer = %peer, error = %error, "Connection ended with error");
                    }
                });
            }
            Err(error) => {
                // Transient accept errors (e.g. aborted handshakes) should
                // not take the listener down.
                tracing::warn!(error = %error, "Accept failed");
            }
        }
    }
}

/// Serve one connection with hyper, bridging requests into exchanges.
async fn serve_connection(
    stream: TcpStream,
    tx: mpsc::Sender<RequestExchange>,
) -> hyper::Result<()> {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let tx = tx.clone();
        async move {
            let (exchange, reply) = RequestExchange::from_request(&req);
            if tx.send(exchange).await.is_err() {
                // Source stopped while this connection was mid-flight.
                return Ok::<_, Infallible>(status_only(StatusCode::SERVICE_UNAVAILABLE));
            }
            Ok(match reply.await {
                Ok(response) => response,
                // Exchange dropped without close; never leave the client hanging.
                Err(_) => status_only(StatusCode::INTERNAL_SERVER_ERROR),
            })
        }
    });

    http1::Builder::new().serve_connection(io, service).await
}

fn status_only(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
