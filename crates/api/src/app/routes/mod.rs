use axum::Router;

pub mod courses;
pub mod sections;
pub mod system;
pub mod users;

/// Router for all resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/users", users::router())
        .nest("/courses", courses::router())
        .nest("/sections", sections::router())
}
