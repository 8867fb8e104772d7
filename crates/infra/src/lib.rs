//! Infrastructure layer: relational storage for users, profiles and courses.

pub mod store;

pub use store::{
    CourseRepository, InMemoryStore, LmsSession, LmsStore, PostgresStore, PostgresStoreOptions,
    StoreError, StoreResult, UserRepository,
};
