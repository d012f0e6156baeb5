//! Request/response exchange handed to dispatch and route handlers.
//!
//! # Responsibilities
//! - Expose the request's method, path, content type and target URL
//! - Collect the response (status, headers, body) written by the engine or
//!   a dynamic handler
//! - Complete the response exactly once via `close`
//!
//! # Design Decisions
//! - The response is buffered and delivered to the connection task over a
//!   oneshot channel when `close` is called
//! - Dropping an exchange without closing it leaves the oneshot dead; the
//!   connection task answers 500 so the client never hangs

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::http::{header, Request, Response, StatusCode};
use tokio::sync::oneshot;

/// Receiving side of a completed response, held by the connection task.
pub(crate) type ResponseReply = oneshot::Receiver<Response<Full<Bytes>>>;

/// One in-flight HTTP exchange.
///
/// Handlers read the request through the accessor methods and produce the
/// response through the sink methods, finishing with [`close`](Self::close).
/// Status, headers and body take effect in that order regardless of the
/// order the sink methods are called in.
pub struct RequestExchange {
    method: String,
    path: String,
    content_type: Option<String>,
    target: String,

    status: u16,
    response_content_type: Option<String>,
    content_length: Option<usize>,
    body: Vec<u8>,
    reply: Option<oneshot::Sender<Response<Full<Bytes>>>>,
}

impl RequestExchange {
    pub(crate) fn new(
        method: String,
        path: String,
        content_type: Option<String>,
        target: String,
    ) -> (Self, ResponseReply) {
        let (tx, rx) = oneshot::channel();
        let exchange = Self {
            method,
            path,
            content_type,
            target,
            status: StatusCode::OK.as_u16(),
            response_content_type: None,
            content_length: None,
            body: Vec::new(),
            reply: Some(tx),
        };
        (exchange, rx)
    }

    /// Build an exchange from an accepted hyper request.
    pub(crate) fn from_request(req: &Request<Incoming>) -> (Self, ResponseReply) {
        let method = req.method().as_str().to_string();
        let path = req.uri().path().to_string();
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let target = match req.headers().get(header::HOST).and_then(|value| value.to_str().ok()) {
            Some(host) => format!("http://{}{}", host, req.uri()),
            None => req.uri().to_string(),
        };
        Self::new(method, path, content_type, target)
    }

    /// Request method, as received.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Absolute request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Full target URL, for diagnostics.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Set the response status code.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Set the response content type.
    pub fn set_content_type(&mut self, content_type: &str) {
        self.response_content_type = Some(content_type.to_string());
    }

    /// Set the response content length header.
    pub fn set_content_length(&mut self, length: usize) {
        self.content_length = Some(length);
    }

    /// Append bytes to the response body.
    pub async fn write_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Complete the response and hand it to the connection.
    pub fn close(mut self) {
        let response = self.build_response();
        if let Some(reply) = self.reply.take() {
            // The connection may already be gone; nothing left to tell it.
            let _ = reply.send(response);
        }
    }

    fn build_response(&mut self) -> Response<Full<Bytes>> {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut builder = Response::builder().status(status);
        if let Some(content_type) = &self.response_content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(length) = self.content_length {
            builder = builder.header(header::CONTENT_LENGTH, length);
        }

        let body = Full::new(Bytes::from(std::mem::take(&mut self.body)));
        builder.body(body).unwrap_or_else(|error| {
            tracing::warn!(error = %error, "Invalid response headers, replacing with 500");
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
    }
}

impl std::fmt::Debug for RequestExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExchange")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("status", &self.status)
            .field("closed", &self.reply.is_none())
            .finish()
    }
}
