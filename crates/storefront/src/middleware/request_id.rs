//! Request ID middleware for correlating logs, Sentry events and responses.
//!
//! An upstream `x-request-id` is reused when it looks sane (short, printable
//! ASCII, no whitespace); anything else is replaced by a fresh UUID v4 so
//! callers cannot smuggle arbitrary text into our logs.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that tags every request with an ID.
///
/// The ID is recorded in the current span, set as a Sentry tag and echoed
/// back in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(accept_upstream_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Accept an upstream ID if it is non-empty, bounded and printable.
fn accept_upstream_id(value: &str) -> Option<String> {
    let ok = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    ok.then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_reasonable_upstream_ids() {
        assert_eq!(
            accept_upstream_id("cf-8a1b2c3d").as_deref(),
            Some("cf-8a1b2c3d")
        );
        assert!(accept_upstream_id(&Uuid::new_v4().to_string()).is_some());
    }

    #[test]
    fn test_rejects_suspicious_upstream_ids() {
        assert!(accept_upstream_id("").is_none());
        assert!(accept_upstream_id("has space").is_none());
        assert!(accept_upstream_id("line\nbreak").is_none());
        assert!(accept_upstream_id(&"x".repeat(MAX_REQUEST_ID_LEN + 1)).is_none());
    }
}
