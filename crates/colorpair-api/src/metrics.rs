//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "colorpair_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "colorpair_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "colorpair_http_requests_in_flight";

    // Analysis metrics
    pub const ANALYSES_TOTAL: &str = "colorpair_analyses_total";
    pub const AI_REQUEST_DURATION_SECONDS: &str = "colorpair_ai_request_duration_seconds";
    pub const FILLERS_APPENDED_TOTAL: &str = "colorpair_fillers_appended_total";
}

/// Paths that get their own label; everything else is grouped.
const KNOWN_PATHS: &[&str] = &[
    "/analyze-image",
    "/health",
    "/healthz",
    "/ready",
    "/metrics",
];

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the outcome of one analysis (`success` or an error kind).
pub fn record_analysis(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
}

/// Record filler records appended to a short model reply.
pub fn record_fillers_appended(count: usize) {
    counter!(names::FILLERS_APPENDED_TOTAL).increment(count as u64);
}

/// Record how long the model call took.
pub fn record_ai_request_duration(ok: bool, duration_secs: f64) {
    let labels = [("result", if ok { "ok" } else { "error" }.to_string())];
    histogram!(names::AI_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Collapse unknown paths so scanners can't blow up label cardinality.
fn sanitize_path(path: &str) -> String {
    if KNOWN_PATHS.contains(&path) {
        path.to_string()
    } else {
        "other".to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
