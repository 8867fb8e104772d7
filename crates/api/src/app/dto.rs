use chrono::SecondsFormat;
use serde::Deserialize;

use lms_core::{DomainResult, Pagination, UserId};
use lms_courses::{Course, NewCourse};
use lms_users::{NewUser, User};

// -------------------------
// Request DTOs
// -------------------------

/// `?skip=&limit=` on list endpoints. Bounds are checked by [`Pagination::new`].
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_skip")]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_skip() -> i64 {
    Pagination::DEFAULT_SKIP
}

fn default_limit() -> i64 {
    Pagination::DEFAULT_LIMIT
}

impl PageQuery {
    pub fn to_pagination(&self) -> DomainResult<Pagination> {
        Pagination::new(self.skip, self.limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub role: String,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> DomainResult<NewUser> {
        NewUser::parse(&self.email, &self.role)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: i64,
}

impl From<CreateCourseRequest> for NewCourse {
    fn from(req: CreateCourseRequest) -> Self {
        NewCourse {
            title: req.title,
            description: req.description,
            user_id: UserId::new(req.user_id),
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn user_to_json(user: User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id.get(),
        "email": user.email,
        "role": user.role.as_str(),
        "is_active": user.is_active,
        "created_at": user.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        "updated_at": user.updated_at.to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}

pub fn course_to_json(course: Course) -> serde_json::Value {
    serde_json::json!({
        "id": course.id.get(),
        "title": course.title,
        "description": course.description,
        "user_id": course.user_id.get(),
    })
}

/// Body returned by endpoints that exist in the interface but have no backing logic.
pub fn placeholder(message: &'static str) -> serde_json::Value {
    serde_json::json!({ "message": message })
}
