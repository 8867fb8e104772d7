use async_trait::async_trait;
use thiserror::Error;

use lms_core::{CourseId, Pagination, UserId};
use lms_courses::{Course, NewCourse};
use lms_users::{NewProfile, NewUser, Profile, User};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure.
///
/// Constraint violations are kept apart from other database errors so callers
/// can map duplicate emails to a conflict instead of an internal error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (SQLSTATE `23505`).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key referenced a missing row (SQLSTATE `23503`).
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A check constraint rejected the write (SQLSTATE `23514`).
    #[error("check constraint violated: {0}")]
    CheckViolation(String),

    /// No connection could be obtained (pool closed, timed out, lock poisoned).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other database-side failure.
    #[error("database error: {0}")]
    Database(String),

    /// A row came back in a shape that does not map onto a domain record.
    #[error("failed to decode row: {0}")]
    Decode(String),
}

/// Per-request handle to a store.
///
/// Owns whatever the backend needs exclusively for one request (a pooled
/// connection for Postgres). Dropping it releases that resource.
pub trait LmsSession: UserRepository + CourseRepository {}

impl<T> LmsSession for T where T: UserRepository + CourseRepository {}

/// Source of per-request sessions.
#[async_trait]
pub trait LmsStore: Send + Sync {
    async fn session(&self) -> StoreResult<Box<dyn LmsSession>>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

#[async_trait]
pub trait UserRepository: Send {
    /// Users in insertion order, windowed by `page`.
    async fn list_users(&mut self, page: Pagination) -> StoreResult<Vec<User>>;

    async fn get_user(&mut self, id: UserId) -> StoreResult<Option<User>>;

    async fn get_user_by_email(&mut self, email: &str) -> StoreResult<Option<User>>;

    /// Insert a user. Fails with `UniqueViolation` when the email is taken.
    async fn create_user(&mut self, new: NewUser) -> StoreResult<User>;

    /// Insert a profile. Fails with `ForeignKeyViolation` for an unknown user and
    /// `UniqueViolation` when the user already has one.
    async fn create_profile(&mut self, new: NewProfile) -> StoreResult<Profile>;

    async fn profile_for_user(&mut self, user_id: UserId) -> StoreResult<Option<Profile>>;
}

#[async_trait]
pub trait CourseRepository: Send {
    /// Courses in insertion order, windowed by `page`.
    async fn list_courses(&mut self, page: Pagination) -> StoreResult<Vec<Course>>;

    async fn get_course(&mut self, id: CourseId) -> StoreResult<Option<Course>>;

    /// Insert a course. Fails with `ForeignKeyViolation` for an unknown owner.
    async fn create_course(&mut self, new: NewCourse) -> StoreResult<Course>;

    /// Every course owned by `user_id`, in insertion order.
    async fn courses_for_user(&mut self, user_id: UserId) -> StoreResult<Vec<Course>>;
}
