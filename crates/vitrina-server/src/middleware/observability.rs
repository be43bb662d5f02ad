//! Request identification and tracing middleware.

use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Extension trait attaching request ids and HTTP tracing spans.
pub trait RouterObservabilityExt {
    /// Attaches request-id generation/propagation and per-request
    /// tracing spans.
    fn with_observability(self) -> Self;
}

impl RouterObservabilityExt for Router {
    fn with_observability(self) -> Self {
        // Layers wrap inside-out: the request id is set before the
        // trace span opens, and propagated onto the response after.
        self.layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }
}
