//! Postgres-backed store implementation.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` |
//! | Database (foreign key violation) | `23503` | `ForeignKeyViolation` |
//! | Database (check violation) | `23514` | `CheckViolation` |
//! | Database (other) | any other | `Database` |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` |
//! | ColumnDecode / ColumnNotFound | N/A | `Decode` |
//!
//! ## Sessions
//!
//! Each [`PostgresSession`] owns one `PoolConnection` for its whole lifetime.
//! The connection goes back to the pool when the session is dropped, on every
//! exit path of the request that opened it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Postgres, Row};
use tracing::{instrument, Span};

use lms_core::{CourseId, Pagination, ProfileId, UserId};
use lms_courses::{Course, NewCourse};
use lms_users::{NewProfile, NewUser, Profile, Role, User};

use super::r#trait::{CourseRepository, LmsSession, LmsStore, StoreError, StoreResult, UserRepository};
use super::schema;

/// Pool sizing for [`PostgresStore::connect`].
#[derive(Debug, Clone)]
pub struct PostgresStoreOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PostgresStoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Postgres-backed store.
///
/// Cloning is cheap: the pool is reference counted internally.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool and make sure the schema exists.
    #[instrument(skip(database_url), fields(max_connections = options.max_connections), err)]
    pub async fn connect(database_url: &str, options: PostgresStoreOptions) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        schema::apply(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl LmsStore for PostgresStore {
    async fn session(&self) -> StoreResult<Box<dyn LmsSession>> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("acquire", e))?;
        Ok(Box::new(PostgresSession { conn }))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// One exclusively-owned pooled connection.
pub struct PostgresSession {
    conn: PoolConnection<Postgres>,
}

const USER_COLUMNS: &str = "id, email, role, is_active, created_at, updated_at";
const PROFILE_COLUMNS: &str = "id, first_name, last_name, bio, user_id, created_at, updated_at";
const COURSE_COLUMNS: &str = "id, title, description, user_id";

#[async_trait]
impl UserRepository for PostgresSession {
    #[instrument(skip(self), fields(row_count = tracing::field::Empty), err)]
    async fn list_users(&mut self, page: Pagination) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC OFFSET $1 LIMIT $2"
        ))
        .bind(page.skip())
        .bind(page.limit())
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("list_users", e))?;

        Span::current().record("row_count", rows.len());
        decode_all::<UserRow, _>(&rows)
    }

    #[instrument(skip(self), err)]
    async fn get_user(&mut self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?;

        row.as_ref().map(decode::<UserRow, _>).transpose()
    }

    #[instrument(skip(self, email), err)]
    async fn get_user_by_email(&mut self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| map_sqlx_error("get_user_by_email", e))?;

        row.as_ref().map(decode::<UserRow, _>).transpose()
    }

    #[instrument(skip(self, new), fields(role = %new.role), err)]
    async fn create_user(&mut self, new: NewUser) -> StoreResult<User> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.email.as_str())
        .bind(new.role.as_str())
        .bind(new.is_active)
        .bind(new.timestamps.created_at)
        .bind(new.timestamps.updated_at)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?;

        decode::<UserRow, _>(&row)
    }

    #[instrument(skip(self, new), fields(user_id = %new.user_id), err)]
    async fn create_profile(&mut self, new: NewProfile) -> StoreResult<Profile> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO profiles (first_name, last_name, bio, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.bio.as_deref())
        .bind(new.user_id.get())
        .bind(new.timestamps.created_at)
        .bind(new.timestamps.updated_at)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("create_profile", e))?;

        decode::<ProfileRow, _>(&row)
    }

    #[instrument(skip(self), err)]
    async fn profile_for_user(&mut self, user_id: UserId) -> StoreResult<Option<Profile>> {
        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id.get())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("profile_for_user", e))?;

        row.as_ref().map(decode::<ProfileRow, _>).transpose()
    }
}

#[async_trait]
impl CourseRepository for PostgresSession {
    #[instrument(skip(self), err)]
    async fn list_courses(&mut self, page: Pagination) -> StoreResult<Vec<Course>> {
        let rows = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY id ASC OFFSET $1 LIMIT $2"
        ))
        .bind(page.skip())
        .bind(page.limit())
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("list_courses", e))?;

        decode_all::<CourseRow, _>(&rows)
    }

    #[instrument(skip(self), err)]
    async fn get_course(&mut self, id: CourseId) -> StoreResult<Option<Course>> {
        let row = sqlx::query(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| map_sqlx_error("get_course", e))?;

        row.as_ref().map(decode::<CourseRow, _>).transpose()
    }

    #[instrument(skip(self, new), fields(user_id = %new.user_id), err)]
    async fn create_course(&mut self, new: NewCourse) -> StoreResult<Course> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO courses (title, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(&new.title)
        .bind(new.description.as_deref())
        .bind(new.user_id.get())
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("create_course", e))?;

        decode::<CourseRow, _>(&row)
    }

    #[instrument(skip(self), err)]
    async fn courses_for_user(&mut self, user_id: UserId) -> StoreResult<Vec<Course>> {
        let rows = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE user_id = $1 ORDER BY id ASC"
        ))
        .bind(user_id.get())
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("courses_for_user", e))?;

        decode_all::<CourseRow, _>(&rows)
    }
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("{} in {}", db_err.message(), operation);
            match db_err.code().as_deref() {
                Some("23505") => StoreError::UniqueViolation(msg),
                Some("23503") => StoreError::ForeignKeyViolation(msg),
                Some("23514") => StoreError::CheckViolation(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Decode(format!("{operation}: {err}"))
        }
        _ => StoreError::Database(format!("sqlx error in {operation}: {err}")),
    }
}

fn decode<R, T>(row: &PgRow) -> StoreResult<T>
where
    R: for<'r> FromRow<'r, PgRow> + TryInto<T, Error = StoreError>,
{
    R::from_row(row)
        .map_err(|e| StoreError::Decode(e.to_string()))?
        .try_into()
}

fn decode_all<R, T>(rows: &[PgRow]) -> StoreResult<Vec<T>>
where
    R: for<'r> FromRow<'r, PgRow> + TryInto<T, Error = StoreError>,
{
    rows.iter().map(decode::<R, T>).collect()
}

// SQLx row types

#[derive(Debug)]
struct UserRow {
    id: i64,
    email: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            role: row.try_get("role")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| StoreError::Decode(format!("users.role: {e}")))?;

        Ok(User {
            id: UserId::new(row.id),
            email: row.email,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug)]
struct ProfileRow {
    id: i64,
    first_name: String,
    last_name: String,
    bio: Option<String>,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for ProfileRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProfileRow {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            bio: row.try_get("bio")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<ProfileRow> for Profile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: ProfileId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug)]
struct CourseRow {
    id: i64,
    title: String,
    description: Option<String>,
    user_id: i64,
}

impl<'r> FromRow<'r, PgRow> for CourseRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CourseRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            user_id: row.try_get("user_id")?,
        })
    }
}

impl TryFrom<CourseRow> for Course {
    type Error = StoreError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Course {
            id: CourseId::new(row.id),
            title: row.title,
            description: row.description,
            user_id: UserId::new(row.user_id),
        })
    }
}
