use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use lms_core::UserId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user))
        .route("/:id/courses", get(list_user_courses))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    let page = match query.to_pagination() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.list_users(page).await {
        Ok(users) => {
            let items = users.into_iter().map(dto::user_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    let new_user = match body.into_new_user() {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.register_user(new_user).await {
        Ok(user) => (StatusCode::CREATED, Json(dto::user_to_json(user))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.get_user(UserId::new(id)).await {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(user))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_user_courses(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.courses_for_user(UserId::new(id)).await {
        Ok(courses) => {
            let items = courses.into_iter().map(dto::course_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
