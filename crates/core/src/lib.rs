//! Shared building blocks for the LMS backend.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod pagination;
pub mod timestamp;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CourseId, ProfileId, UserId};
pub use pagination::Pagination;
pub use timestamp::Timestamps;
