//! Request handlers.

use axum::http::StatusCode;

pub async fn hello() -> (StatusCode, &'static str) {
    (StatusCode::OK, "hello world")
}

/// Liveness probe, excluded from request tracing.
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
