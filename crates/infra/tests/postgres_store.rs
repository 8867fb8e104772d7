//! Postgres store tests against a live database.
//!
//! Skipped unless `LMS_TEST_DATABASE_URL` points at a disposable database.
//! Emails are made unique per run so the tests tolerate existing rows.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;

use lms_core::{Pagination, UserId};
use lms_courses::NewCourse;
use lms_infra::{LmsStore, PostgresStore, PostgresStoreOptions, StoreError};
use lms_users::{NewProfile, NewUser};

static COUNTER: AtomicU32 = AtomicU32::new(0);

async fn store() -> Option<PostgresStore> {
    let url = std::env::var("LMS_TEST_DATABASE_URL").ok()?;
    Some(
        PostgresStore::connect(&url, PostgresStoreOptions::default())
            .await
            .expect("failed to connect to LMS_TEST_DATABASE_URL"),
    )
}

fn unique_email(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!(
        "{prefix}.{}.{n}@example.com",
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

#[tokio::test]
async fn user_round_trip_and_duplicate_email() {
    let Some(store) = store().await else { return };
    let mut session = store.session().await.unwrap();

    let email = unique_email("ada");
    let user = session
        .create_user(NewUser::parse(&email, "teacher").unwrap())
        .await
        .unwrap();
    assert_eq!(user.email, email);
    assert!(!user.is_active);

    let fetched = session.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, email);

    let err = session
        .create_user(NewUser::parse(&email, "student").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(_)));
}

#[tokio::test]
async fn listing_is_ordered_by_id() {
    let Some(store) = store().await else { return };
    let mut session = store.session().await.unwrap();

    session
        .create_user(NewUser::parse(&unique_email("a"), "student").unwrap())
        .await
        .unwrap();
    session
        .create_user(NewUser::parse(&unique_email("b"), "student").unwrap())
        .await
        .unwrap();

    let users = session
        .list_users(Pagination::new(0, 1000).unwrap())
        .await
        .unwrap();
    assert!(users.windows(2).all(|w| w[0].id < w[1].id));

    let one = session.list_users(Pagination::new(0, 1).unwrap()).await.unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].id, users[0].id);
}

#[tokio::test]
async fn courses_and_profiles_follow_their_owner() {
    let Some(store) = store().await else { return };
    let mut session = store.session().await.unwrap();

    let owner = session
        .create_user(NewUser::parse(&unique_email("owner"), "teacher").unwrap())
        .await
        .unwrap();

    let course = session
        .create_course(NewCourse {
            title: "Databases".into(),
            description: Some("relational basics".into()),
            user_id: owner.id,
        })
        .await
        .unwrap();
    assert_eq!(session.courses_for_user(owner.id).await.unwrap(), vec![course.clone()]);
    assert_eq!(session.get_course(course.id).await.unwrap(), Some(course));

    let profile = session
        .create_profile(NewProfile::new(owner.id, "Edgar", "Codd", None).unwrap())
        .await
        .unwrap();
    assert_eq!(session.profile_for_user(owner.id).await.unwrap(), Some(profile));

    let err = session
        .create_course(NewCourse {
            title: "Orphan".into(),
            description: None,
            user_id: UserId::new(i64::MAX),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
}
