//! # Request Metrics
//!
//! Per-request counters and latency histograms through the `metrics`
//! facade. The binary installs a Prometheus recorder and serves the
//! rendered registry at `/metrics`.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Middleware recording a counter and a latency histogram per request,
/// labeled by method, matched route template, and status class.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    // The route template, not the concrete path, keeps label cardinality
    // bounded.
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed();

    let status = response.status().as_u16().to_string();
    let labels = [
        ("method", method),
        ("route", route),
        ("status", status),
    ];
    metrics::counter!("rollcall_http_requests_total", &labels).increment(1);
    metrics::histogram!("rollcall_http_request_duration_seconds", &labels)
        .record(elapsed.as_secs_f64());

    response
}
