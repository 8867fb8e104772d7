use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use lms_core::CourseId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/:id",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .route("/:id/sections", get(list_course_sections))
}

pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    let page = match query.to_pagination() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.list_courses(page).await {
        Ok(courses) => {
            let items = courses.into_iter().map(dto::course_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCourseRequest>,
) -> axum::response::Response {
    match services.create_course(body.into()).await {
        Ok(course) => (StatusCode::CREATED, Json(dto::course_to_json(course))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.get_course(CourseId::new(id)).await {
        Ok(course) => (StatusCode::OK, Json(dto::course_to_json(course))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

// Not implemented: these accept any course id and change nothing.

pub async fn update_course(Path(_id): Path<i64>) -> impl IntoResponse {
    Json(dto::placeholder("Update endpoint not yet implemented"))
}

pub async fn delete_course(Path(_id): Path<i64>) -> impl IntoResponse {
    Json(dto::placeholder("Delete endpoint not yet implemented"))
}

pub async fn list_course_sections(Path(_id): Path<i64>) -> impl IntoResponse {
    Json(dto::placeholder("Sections endpoint not yet implemented"))
}
