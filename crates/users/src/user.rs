//! User accounts (teachers and students).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lms_core::{DomainResult, Entity, Timestamps, UserId};

use crate::{Email, Role};

/// A stored user account.
///
/// # Invariants
/// - `email` is unique across all users (enforced by the store).
/// - `created_at == updated_at` for every row, since no operation updates users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Validated input for a user insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: Email,
    pub role: Role,
    /// Accounts start inactive.
    pub is_active: bool,
    pub timestamps: Timestamps,
}

impl NewUser {
    /// Build an insert from raw request values.
    pub fn parse(email: &str, role: &str) -> DomainResult<Self> {
        Ok(Self {
            email: Email::parse(email)?,
            role: role.parse()?,
            is_active: false,
            timestamps: Timestamps::now(),
        })
    }

    /// Materialise the stored row once the store has assigned an id.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email.into_inner(),
            role: self.role,
            is_active: self.is_active,
            created_at: self.timestamps.created_at,
            updated_at: self.timestamps.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::DomainError;

    #[test]
    fn parse_builds_an_inactive_user() {
        let new = NewUser::parse("grace@example.com", "teacher").unwrap();
        assert_eq!(new.email.as_str(), "grace@example.com");
        assert_eq!(new.role, Role::Teacher);
        assert!(!new.is_active);
    }

    #[test]
    fn parse_rejects_unknown_role_before_anything_else_happens() {
        let err = NewUser::parse("grace@example.com", "principal").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn into_user_carries_every_field() {
        let new = NewUser::parse("grace@example.com", "student").unwrap();
        let ts = new.timestamps;
        let user = new.into_user(UserId::new(7));

        assert_eq!(user.id(), UserId::new(7));
        assert_eq!(user.email, "grace@example.com");
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.created_at, ts.created_at);
        assert_eq!(user.updated_at, ts.updated_at);
    }
}
