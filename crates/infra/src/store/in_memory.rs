use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use lms_core::{CourseId, Entity, Pagination, ProfileId, UserId};
use lms_courses::{Course, NewCourse};
use lms_users::{NewProfile, NewUser, Profile, User};

use super::r#trait::{CourseRepository, LmsSession, LmsStore, StoreError, StoreResult, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<Profile>,
    courses: Vec<Course>,
    next_user_id: i64,
    next_profile_id: i64,
    next_course_id: i64,
}

impl Tables {
    fn user_exists(&self, id: UserId) -> bool {
        find(&self.users, id).is_some()
    }
}

/// In-memory store with the same constraints as the relational schema.
///
/// Intended for tests/dev. Rows live in insertion order, ids start at 1.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LmsStore for InMemoryStore {
    async fn session(&self) -> StoreResult<Box<dyn LmsSession>> {
        Ok(Box::new(InMemorySession {
            tables: Arc::clone(&self.tables),
        }))
    }

    fn backend(&self) -> &'static str {
        "in_memory"
    }
}

/// Session over the shared tables. Holds no lock between calls.
pub struct InMemorySession {
    tables: Arc<RwLock<Tables>>,
}

impl InMemorySession {
    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

fn find<E: Entity>(rows: &[E], id: E::Id) -> Option<&E> {
    rows.iter().find(|row| row.id() == id)
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[async_trait]
impl UserRepository for InMemorySession {
    async fn list_users(&mut self, page: Pagination) -> StoreResult<Vec<User>> {
        let tables = self.read()?;
        Ok(page.window(tables.users.iter().cloned()).collect())
    }

    async fn get_user(&mut self, id: UserId) -> StoreResult<Option<User>> {
        Ok(find(&self.read()?.users, id).cloned())
    }

    async fn get_user_by_email(&mut self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.read()?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&mut self, new: NewUser) -> StoreResult<User> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.email == new.email.as_str()) {
            return Err(StoreError::UniqueViolation(format!(
                "users.email '{}' already exists",
                new.email
            )));
        }

        let id = UserId::new(next_id(&mut tables.next_user_id));
        let user = new.into_user(id);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn create_profile(&mut self, new: NewProfile) -> StoreResult<Profile> {
        let mut tables = self.write()?;
        if !tables.user_exists(new.user_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "profiles.user_id {} does not reference a user",
                new.user_id
            )));
        }
        if tables.profiles.iter().any(|p| p.user_id == new.user_id) {
            return Err(StoreError::UniqueViolation(format!(
                "profiles.user_id {} already has a profile",
                new.user_id
            )));
        }

        let id = ProfileId::new(next_id(&mut tables.next_profile_id));
        let profile = new.into_profile(id);
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn profile_for_user(&mut self, user_id: UserId) -> StoreResult<Option<Profile>> {
        let tables = self.read()?;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }
}

#[async_trait]
impl CourseRepository for InMemorySession {
    async fn list_courses(&mut self, page: Pagination) -> StoreResult<Vec<Course>> {
        let tables = self.read()?;
        Ok(page.window(tables.courses.iter().cloned()).collect())
    }

    async fn get_course(&mut self, id: CourseId) -> StoreResult<Option<Course>> {
        Ok(find(&self.read()?.courses, id).cloned())
    }

    async fn create_course(&mut self, new: NewCourse) -> StoreResult<Course> {
        let mut tables = self.write()?;
        if !tables.user_exists(new.user_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "courses.user_id {} does not reference a user",
                new.user_id
            )));
        }

        let id = CourseId::new(next_id(&mut tables.next_course_id));
        let course = new.into_course(id);
        tables.courses.push(course.clone());
        Ok(course)
    }

    async fn courses_for_user(&mut self, user_id: UserId) -> StoreResult<Vec<Course>> {
        let tables = self.read()?;
        Ok(tables
            .courses
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser::parse(email, "teacher").unwrap()
    }

    fn new_course(title: &str, user_id: UserId) -> NewCourse {
        NewCourse {
            title: title.to_string(),
            description: None,
            user_id,
        }
    }

    #[tokio::test]
    async fn created_user_is_retrievable_by_id_and_email() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();

        let user = session.create_user(new_user("ada@example.com")).await.unwrap();
        assert_eq!(user.id, UserId::new(1));

        let by_id = session.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(by_id, user);

        let by_email = session.get_user_by_email("ada@example.com").await.unwrap();
        assert_eq!(by_email, Some(user));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation_and_stores_nothing() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();

        session.create_user(new_user("ada@example.com")).await.unwrap();
        let err = session.create_user(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));

        let all = session.list_users(Pagination::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn list_users_is_windowed_in_insertion_order() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();

        let first = session.create_user(new_user("a@example.com")).await.unwrap();
        session.create_user(new_user("b@example.com")).await.unwrap();

        let page = session
            .list_users(Pagination::new(0, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(page, vec![first]);

        let rest = session
            .list_users(Pagination::new(1, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].email, "b@example.com");
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();
        assert_eq!(session.get_user(UserId::new(999_999)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn courses_are_filtered_by_owner() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();

        let ada = session.create_user(new_user("ada@example.com")).await.unwrap();
        let bob = session.create_user(new_user("bob@example.com")).await.unwrap();

        let c1 = session.create_course(new_course("Rust", ada.id)).await.unwrap();
        session.create_course(new_course("Go", bob.id)).await.unwrap();
        let c3 = session.create_course(new_course("Zig", ada.id)).await.unwrap();

        let owned = session.courses_for_user(ada.id).await.unwrap();
        assert_eq!(owned, vec![c1.clone(), c3]);

        assert_eq!(session.get_course(c1.id).await.unwrap(), Some(c1));
        assert!(session.courses_for_user(UserId::new(42)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn course_for_unknown_owner_is_rejected() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();

        let err = session
            .create_course(new_course("Orphan", UserId::new(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
        assert!(session.list_courses(Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_profile_per_user() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();
        let ada = session.create_user(new_user("ada@example.com")).await.unwrap();

        let profile = session
            .create_profile(NewProfile::new(ada.id, "Ada", "Lovelace", None).unwrap())
            .await
            .unwrap();
        assert_eq!(session.profile_for_user(ada.id).await.unwrap(), Some(profile));

        let err = session
            .create_profile(NewProfile::new(ada.id, "Ada", "Byron", None).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));

        let err = session
            .create_profile(NewProfile::new(UserId::new(77), "No", "One", None).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn sessions_share_the_same_tables() {
        let store = InMemoryStore::new();
        let user = {
            let mut s1 = store.session().await.unwrap();
            s1.create_user(new_user("ada@example.com")).await.unwrap()
        };

        let mut s2 = store.session().await.unwrap();
        assert_eq!(s2.get_user(user.id).await.unwrap(), Some(user));
    }
}
