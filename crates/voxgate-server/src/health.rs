use axum::{Json, response::IntoResponse};
use http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    timestamp: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok",
            timestamp: jiff::Timestamp::now().to_string(),
        }),
    )
}
