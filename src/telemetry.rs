//! Telemetry utilities for request timing and tracing spans.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::Instrument;

/// Guard for timing a resource operation and recording metrics.
///
/// Records latency when dropped, including on early error returns.
pub struct RequestTimer {
    entity: &'static str,
    operation: &'static str,
    start: Instant,
}

impl RequestTimer {
    /// Start timing an operation on an entity.
    pub fn new(entity: &'static str, operation: &'static str) -> Self {
        Self {
            entity,
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_request(self.entity, self.operation, duration);
    }
}

/// Middleware wrapping each request in a [`spans::request`] span.
pub async fn trace_request(request: Request, next: Next) -> Response {
    let span = spans::request(request.method().as_str(), request.uri().path());
    async move {
        let response = next.run(request).await;
        tracing::debug!(status = response.status().as_u16(), "Request completed");
        response
    }
    .instrument(span)
    .await
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one HTTP request.
    pub fn request(method: &str, path: &str) -> Span {
        info_span!("request", method = %method, path = %path)
    }
}
