//! Data-access boundary.
//!
//! Handlers never talk to a pool directly: they open one [`LmsSession`] per
//! request through [`LmsStore::session`] and drop it when the request ends.

pub mod in_memory;
pub mod postgres;
pub mod schema;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::{PostgresStore, PostgresStoreOptions};
pub use r#trait::{CourseRepository, LmsSession, LmsStore, StoreError, StoreResult, UserRepository};
