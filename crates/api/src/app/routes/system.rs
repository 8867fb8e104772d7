use axum::{response::IntoResponse, Json};

/// Liveness probe. Never touches the store.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}
