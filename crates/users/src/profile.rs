//! User profiles (personal details, at most one per user).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lms_core::{DomainError, DomainResult, Entity, ProfileId, Timestamps, UserId};

pub const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Profile {
    type Id = ProfileId;

    fn id(&self) -> ProfileId {
        self.id
    }
}

/// Validated input for a profile insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub user_id: UserId,
    pub timestamps: Timestamps,
}

impl NewProfile {
    pub fn new(
        user_id: UserId,
        first_name: &str,
        last_name: &str,
        bio: Option<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            first_name: required_name("first_name", first_name)?,
            last_name: required_name("last_name", last_name)?,
            bio,
            user_id,
            timestamps: Timestamps::now(),
        })
    }

    pub fn into_profile(self, id: ProfileId) -> Profile {
        Profile {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            user_id: self.user_id,
            created_at: self.timestamps.created_at,
            updated_at: self.timestamps.updated_at,
        }
    }
}

fn required_name(field: &str, raw: &str) -> DomainResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(value.to_string())
}
