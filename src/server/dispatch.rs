//! Request dispatch: route lookup and response writing.
//!
//! # Responsibilities
//! - Match an accepted exchange against the route table
//! - Write static responses on behalf of the engine
//! - Answer 404 and emit one diagnostic line when nothing matches
//!
//! # Design Decisions
//! - A dynamic handler owns the exchange from the moment it is invoked;
//!   the engine never writes to the response after handing it over
//! - Non-GET requests fall through to 404 because the route key encodes
//!   the method; no method-not-allowed distinction is made

use std::sync::Arc;

use crate::http::RequestExchange;
use crate::observability::LogSink;
use crate::routing::{RouteEntry, RouteTable};

/// Dispatch one accepted exchange. Runs as its own spawned task so a
/// panicking handler is isolated from the acceptance loop.
pub(crate) async fn dispatch(mut exchange: RequestExchange, routes: Arc<RouteTable>, log: LogSink) {
    match routes.lookup(exchange.method(), exchange.path()) {
        Some(RouteEntry::Dynamic(handler)) => {
            tracing::debug!(method = %exchange.method(), path = %exchange.path(), "Dispatching to handler");
            let handler = handler.clone();
            handler.as_ref()(exchange).await;
        }
        Some(RouteEntry::Static { body, mime }) => {
            tracing::debug!(method = %exchange.method(), path = %exchange.path(), "Serving static route");
            let body = body.clone();
            let mime = mime.clone();
            exchange.set_status(200);
            exchange.set_content_type(&mime);
            exchange.set_content_length(body.len());
            exchange.write_body(&body).await;
            exchange.close();
        }
        None => {
            let content_type = exchange.content_type().unwrap_or("no content-type");
            log.emit(&format!(
                "Failed {} ({}) request to {}, no matching route",
                exchange.method(),
                content_type,
                exchange.target()
            ));
            tracing::debug!(method = %exchange.method(), target = %exchange.target(), "No matching route");
            exchange.set_status(404);
            exchange.close();
        }
    }
}
