//! Section and content-block endpoints. Declared only; there is no model behind them.

use axum::{extract::Path, response::IntoResponse, routing::get, Json, Router};

use crate::app::dto;

pub fn router() -> Router {
    Router::new()
        .route("/:id", get(get_section))
        .route("/:id/content-blocks", get(list_section_content_blocks))
        .route("/content-blocks/:id", get(get_content_block))
}

pub async fn get_section(Path(_id): Path<i64>) -> impl IntoResponse {
    Json(dto::placeholder("Section endpoint not yet implemented"))
}

pub async fn list_section_content_blocks(Path(_id): Path<i64>) -> impl IntoResponse {
    Json(dto::placeholder("Content blocks endpoint not yet implemented"))
}

pub async fn get_content_block(Path(_id): Path<i64>) -> impl IntoResponse {
    Json(dto::placeholder("Content block endpoint not yet implemented"))
}
