//! Request identification and tracing spans.
//!
//! A UUID v4 request ID is generated as early as possible unless the client
//! already sent `x-request-id`, recorded on the request span, and echoed in
//! the response.

use axum::body::Body;
use axum::http::Request;
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID of a request, or `unknown` before the ID layer has run.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span factory for `TraceLayer`.
pub fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id(request),
        method = %request.method(),
        path = %request.uri().path(),
    )
}
