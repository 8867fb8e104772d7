//! Store wiring and the operations exposed to HTTP handlers.
//!
//! Each operation opens exactly one store session and drops it before
//! returning, so a request holds at most one pooled connection and always
//! gives it back, whichever way the operation ends.

use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use lms_core::{CourseId, DomainError, Pagination, UserId};
use lms_courses::{Course, NewCourse};
use lms_infra::{InMemoryStore, LmsSession, LmsStore, PostgresStore, StoreError};
use lms_users::{NewUser, User};

use crate::config::AppConfig;

pub const EMAIL_ALREADY_REGISTERED: &str = "Email already registered";

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn LmsStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn LmsStore>) -> Self {
        Self { store }
    }

    /// Services over a fresh, empty in-memory store (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    async fn session(&self) -> ServiceResult<Box<dyn LmsSession>> {
        Ok(self.store.session().await?)
    }

    // -------------------------
    // Users
    // -------------------------

    pub async fn list_users(&self, page: Pagination) -> ServiceResult<Vec<User>> {
        let mut session = self.session().await?;
        Ok(session.list_users(page).await?)
    }

    /// Insert a user unless the email is already registered.
    ///
    /// The lookup catches the common case; the unique index catches a
    /// concurrent insert of the same email between lookup and insert.
    pub async fn register_user(&self, new: NewUser) -> ServiceResult<User> {
        let mut session = self.session().await?;

        if session.get_user_by_email(new.email.as_str()).await?.is_some() {
            return Err(DomainError::conflict(EMAIL_ALREADY_REGISTERED).into());
        }

        match session.create_user(new).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "user registered");
                Ok(user)
            }
            Err(StoreError::UniqueViolation(_)) => {
                Err(DomainError::conflict(EMAIL_ALREADY_REGISTERED).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user(&self, id: UserId) -> ServiceResult<User> {
        let mut session = self.session().await?;
        session
            .get_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User").into())
    }

    /// Courses authored by `user_id`; an unknown user simply owns none.
    pub async fn courses_for_user(&self, user_id: UserId) -> ServiceResult<Vec<Course>> {
        let mut session = self.session().await?;
        Ok(session.courses_for_user(user_id).await?)
    }

    // -------------------------
    // Courses
    // -------------------------

    pub async fn list_courses(&self, page: Pagination) -> ServiceResult<Vec<Course>> {
        let mut session = self.session().await?;
        Ok(session.list_courses(page).await?)
    }

    pub async fn create_course(&self, new: NewCourse) -> ServiceResult<Course> {
        let mut session = self.session().await?;
        let course = session.create_course(new).await?;
        tracing::info!(course_id = %course.id, user_id = %course.user_id, "course created");
        Ok(course)
    }

    pub async fn get_course(&self, id: CourseId) -> ServiceResult<Course> {
        let mut session = self.session().await?;
        session
            .get_course(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Course").into())
    }
}

/// Pick the store backend from configuration.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if config.use_persistent_stores {
        let store = PostgresStore::connect(&config.database_url, config.store_options())
            .await
            .context("failed to connect to Postgres")?;
        tracing::info!(
            max_connections = config.database_max_connections,
            "using postgres store"
        );
        return Ok(AppServices::new(Arc::new(store)));
    }

    tracing::warn!("USE_PERSISTENT_STORES is not set; using in-memory store (data is lost on restart)");
    Ok(AppServices::in_memory())
}
