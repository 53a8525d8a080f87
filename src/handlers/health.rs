use axum::http::StatusCode;

/// Liveness probe
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
