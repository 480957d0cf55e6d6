//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. Request ID (assign `x-request-id`, echo it on the response)
//! 3. `TraceLayer` (request span with method, uri, status, latency)
//! 4. Request ID tagging (Sentry scope)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)

pub mod request_id;
pub mod session;

pub use request_id::{request_id, tag_request_id};
pub use session::{SESSION_COOKIE_NAME, create_session_layer, session_layer};
