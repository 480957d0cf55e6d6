//! Request ID correlation.
//!
//! `tower-http` assigns an `x-request-id` (keeping one sent by an upstream
//! proxy) and copies it onto the response. This middleware tags the Sentry
//! scope with it so captured errors can be matched to log lines.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;

/// Read the request ID from a request, if one has been assigned.
#[must_use]
pub fn request_id<B>(request: &axum::http::Request<B>) -> Option<&str> {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
}

/// Add the request ID to the Sentry scope.
pub async fn tag_request_id(request: Request, next: Next) -> Response {
    if let Some(id) = request_id(&request) {
        sentry::configure_scope(|scope| {
            scope.set_tag("request_id", id);
        });
    }

    next.run(request).await
}
