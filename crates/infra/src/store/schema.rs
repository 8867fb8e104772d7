//! Relational schema for the LMS tables (PostgreSQL).
//!
//! Applied at startup; every statement is idempotent.

use sqlx::PgPool;
use tracing::instrument;

use super::postgres::map_sqlx_error;
use super::r#trait::StoreResult;

pub const POSTGRES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          BIGSERIAL PRIMARY KEY,
    email       VARCHAR(100) NOT NULL UNIQUE,
    role        TEXT NOT NULL CHECK (role IN ('teacher', 'student')),
    is_active   BOOLEAN NOT NULL DEFAULT FALSE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS profiles (
    id          BIGSERIAL PRIMARY KEY,
    first_name  VARCHAR(50) NOT NULL,
    last_name   VARCHAR(50) NOT NULL,
    bio         TEXT,
    user_id     BIGINT NOT NULL UNIQUE REFERENCES users (id),
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS courses (
    id          BIGSERIAL PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    user_id     BIGINT NOT NULL REFERENCES users (id)
);

CREATE INDEX IF NOT EXISTS courses_user_id_idx ON courses (user_id);
"#;

/// Create the tables if they do not exist yet.
#[instrument(skip(pool), err)]
pub async fn apply(pool: &PgPool) -> StoreResult<()> {
    sqlx::raw_sql(POSTGRES_SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("apply_schema", e))?;
    Ok(())
}
