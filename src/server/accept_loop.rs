//! Bounded-concurrency acceptance loop.
//!
//! # Responsibilities
//! - Hold exactly `max_concurrent_requests` pending accept operations
//! - React to whichever in-flight operation finishes first
//! - Hand completed accepts to dispatch and immediately re-arm the slot
//! - Observe the shutdown signal cooperatively at the top of each iteration
//!
//! # Design Decisions
//! - `FuturesUnordered` races the dynamic in-flight set: O(1) reaction to
//!   the first completion, no polling of individual slots
//! - Dispatches are spawned tasks tracked in the same set; their panics are
//!   caught at the join boundary and never crash the loop
//! - Only consumed accept slots are re-armed. Dispatch completions retire
//!   their entry without adding one, so the accept-slot count stays at the
//!   ceiling while dispatch work is fire-and-forget

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use tokio::task::JoinError;

use crate::http::RequestExchange;
use crate::lifecycle::Shutdown;
use crate::net::ConnectionSource;
use crate::observability::LogSink;
use crate::routing::RouteTable;
use crate::server::dispatch;

/// One completed in-flight operation.
enum Completed {
    /// An accept slot resolved; `None` means the source has stopped.
    Accepted(Option<RequestExchange>),
    /// A spawned dispatch finished (or panicked).
    Dispatched(Result<(), JoinError>),
}

/// Run the acceptance loop until the shutdown signal is observed or the
/// connection source stops and the in-flight set drains.
pub(crate) async fn run(
    source: Arc<dyn ConnectionSource>,
    routes: Arc<RouteTable>,
    log: LogSink,
    max_concurrent_requests: usize,
    shutdown: Shutdown,
) {
    let mut in_flight: FuturesUnordered<BoxFuture<'static, Completed>> = FuturesUnordered::new();
    for _ in 0..max_concurrent_requests {
        in_flight.push(accept_slot(source.clone()));
    }
    tracing::info!(accept_slots = max_concurrent_requests, "Acceptance loop running");

    loop {
        if shutdown.is_triggered() {
            break;
        }
        let completed = tokio::select! {
            _ = shutdown.triggered() => break,
            next = in_flight.next() => match next {
                Some(completed) => completed,
                // Source stopped and every dispatch has retired.
                None => break,
            },
        };

        match completed {
            Completed::Accepted(Some(exchange)) => {
                let handle = tokio::spawn(dispatch::dispatch(exchange, routes.clone(), log.clone()));
                in_flight.push(Box::pin(async move { Completed::Dispatched(handle.await) }));
                // Re-arm the consumed accept slot straight away.
                in_flight.push(accept_slot(source.clone()));
            }
            Completed::Accepted(None) => {
                // Source stopped; the slot stays retired.
            }
            Completed::Dispatched(Ok(())) => {}
            Completed::Dispatched(Err(error)) => {
                tracing::error!(error = %error, "Request handler panicked");
            }
        }
    }

    tracing::info!("Acceptance loop stopped");
}

fn accept_slot(source: Arc<dyn ConnectionSource>) -> BoxFuture<'static, Completed> {
    Box::pin(async move { Completed::Accepted(source.accept_next().await) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prefix;
    use crate::net::BindError;
    use crate::routing::{RouteEntry, RouteHandler, GET};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// In-memory source that records how many accept operations are
    /// pending at once.
    struct MockSource {
        rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<RequestExchange>>,
        pending: AtomicUsize,
        high_water: AtomicUsize,
        accepting: AtomicBool,
    }

    impl MockSource {
        fn new() -> (Arc<Self>, mpsc::UnboundedSender<RequestExchange>) {
            let (tx, rx) = mpsc::unbounded_channel();
            let source = Arc::new(Self {
                rx: tokio::sync::Mutex::new(rx),
                pending: AtomicUsize::new(0),
                high_water: AtomicUsize::new(0),
                accepting: AtomicBool::new(true),
            });
            (source, tx)
        }
    }

    #[async_trait]
    impl ConnectionSource for MockSource {
        async fn bind(&self, _prefixes: &[Prefix]) -> Result<(), BindError> {
            Ok(())
        }

        async fn accept_next(&self) -> Option<RequestExchange> {
            let now = self.pending.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);
            let item = self.rx.lock().await.recv().await;
            self.pending.fetch_sub(1, Ordering::SeqCst);
            item
        }

        fn stop_accepting(&self) {
            self.accepting.store(false, Ordering::SeqCst);
        }

        fn is_accepting(&self) -> bool {
            self.accepting.load(Ordering::SeqCst)
        }
    }

    fn exchange_for(path: &str) -> (RequestExchange, crate::http::exchange::ResponseReply) {
        RequestExchange::new(
            "GET".to_string(),
            path.to_string(),
            None,
            format!("http://localhost{path}"),
        )
    }

    fn counting_routes(counter: Arc<AtomicUsize>) -> Arc<RouteTable> {
        let mut table = RouteTable::new();
        let handler: RouteHandler = Arc::new(move |mut exchange: RequestExchange| {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                exchange.set_status(200);
                exchange.close();
            })
        });
        table
            .register(GET, "/count", RouteEntry::Dynamic(handler))
            .expect("register");
        Arc::new(table)
    }

    #[tokio::test]
    async fn accept_slots_stay_at_the_ceiling() {
        const SLOTS: usize = 4;
        const REQUESTS: usize = 20;

        let (source, tx) = MockSource::new();
        let handled = Arc::new(AtomicUsize::new(0));
        let routes = counting_routes(handled.clone());
        let shutdown = Shutdown::new();

        let loop_task = tokio::spawn(run(
            source.clone(),
            routes,
            LogSink::default(),
            SLOTS,
            shutdown.clone(),
        ));

        let mut replies = Vec::new();
        for _ in 0..REQUESTS {
            let (exchange, reply) = exchange_for("/count");
            tx.send(exchange).expect("send");
            replies.push(reply);
        }
        for reply in replies {
            let response = tokio::time::timeout(Duration::from_secs(5), reply)
                .await
                .expect("dispatch within deadline")
                .expect("response delivered");
            assert_eq!(response.status(), 200);
        }

        assert_eq!(handled.load(Ordering::SeqCst), REQUESTS);
        // Never more than SLOTS accepts pending.
        assert_eq!(source.high_water.load(Ordering::SeqCst), SLOTS);
        // Every consumed slot gets re-armed; give the loop a beat to poll
        // the last replacement future.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while source.pending.load(Ordering::SeqCst) != SLOTS {
            assert!(tokio::time::Instant::now() < deadline, "accept slots not replenished");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        shutdown.trigger();
        loop_task.await.expect("loop task");
    }

    #[tokio::test]
    async fn shutdown_stops_the_loop() {
        let (source, _tx) = MockSource::new();
        let routes = Arc::new(RouteTable::new());
        let shutdown = Shutdown::new();

        let loop_task = tokio::spawn(run(
            source,
            routes,
            LogSink::default(),
            2,
            shutdown.clone(),
        ));

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), loop_task)
            .await
            .expect("loop exits after trigger")
            .expect("loop task");
    }

    #[tokio::test]
    async fn loop_exits_when_the_source_drains() {
        let (source, tx) = MockSource::new();
        let routes = Arc::new(RouteTable::new());
        let shutdown = Shutdown::new();

        let loop_task = tokio::spawn(run(
            source,
            routes,
            LogSink::default(),
            3,
            shutdown.clone(),
        ));

        // Closing the channel makes every pending accept resolve to None.
        drop(tx);
        tokio::time::timeout(Duration::from_secs(5), loop_task)
            .await
            .expect("loop exits when source drains")
            .expect("loop task");
    }

    #[tokio::test]
    async fn panicking_handler_does_not_kill_the_loop() {
        let mut table = RouteTable::new();
        let panicking: RouteHandler = Arc::new(|_exchange: RequestExchange| {
            Box::pin(async move {
                panic!("handler blew up");
            })
        });
        table
            .register(GET, "/boom", RouteEntry::Dynamic(panicking))
            .expect("register");
        let handled = Arc::new(AtomicUsize::new(0));
        let counter = handled.clone();
        let counting: RouteHandler = Arc::new(move |mut exchange: RequestExchange| {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                exchange.set_status(200);
                exchange.close();
            })
        });
        table
            .register(GET, "/ok", RouteEntry::Dynamic(counting))
            .expect("register");
        let routes = Arc::new(table);

        let (source, tx) = MockSource::new();
        let shutdown = Shutdown::new();
        let loop_task = tokio::spawn(run(
            source,
            routes,
            LogSink::default(),
            2,
            shutdown.clone(),
        ));

        let (boom, boom_reply) = exchange_for("/boom");
        tx.send(boom).expect("send");
        // The panicked dispatch dropped its exchange without closing.
        assert!(boom_reply.await.is_err());

        let (ok, ok_reply) = exchange_for("/ok");
        tx.send(ok).expect("send");
        let response = tokio::time::timeout(Duration::from_secs(5), ok_reply)
            .await
            .expect("loop still dispatching")
            .expect("response delivered");
        assert_eq!(response.status(), 200);
        assert_eq!(handled.load(Ordering::SeqCst), 1);

        shutdown.trigger();
        loop_task.await.expect("loop task");
    }
}
