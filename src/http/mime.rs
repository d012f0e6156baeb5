//! MIME type constants for static routes.

/// `text/plain`
pub const TEXT_PLAIN: &str = "text/plain";

/// `text/html`
pub const TEXT_HTML: &str = "text/html";

/// `application/json`
pub const APPLICATION_JSON: &str = "application/json";

/// `application/octet-stream`
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Default MIME type for byte-payload static routes.
pub const DEFAULT_BYTES: &str = OCTET_STREAM;

/// Default MIME type for text static routes.
pub const DEFAULT_TEXT: &str = TEXT_PLAIN;
