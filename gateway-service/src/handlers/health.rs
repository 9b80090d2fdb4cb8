use crate::services::get_metrics;
use axum::{http::StatusCode, http::Uri, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Fixed acknowledgment served at `/`.
pub const ROOT_MESSAGE: &str = "Multimodal gateway is running!";

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": ROOT_MESSAGE }))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gateway-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}
