use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use crate::infrastructure::storage::StorageManager;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(storage): State<Arc<StorageManager>>) -> impl IntoResponse {
    if storage.is_writable().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "storage": "writable"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "storage": "unavailable"
            })),
        )
    }
}
