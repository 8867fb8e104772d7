use serde::{Deserialize, Serialize};

use lms_core::{CourseId, Entity, UserId};

/// A stored course.
///
/// `user_id` always references an existing user (enforced by the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub user_id: UserId,
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> CourseId {
        self.id
    }
}

/// Input for a course insert. Courses carry no uniqueness rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub user_id: UserId,
}

impl NewCourse {
    pub fn into_course(self, id: CourseId) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            user_id: self.user_id,
        }
    }
}
